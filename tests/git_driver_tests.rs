/// End-to-end runs of the orchestrator against a real repository
use stackforest::git::{GitRepository, VcsDriver};
use stackforest::stack::RebaseOrchestrator;
use stackforest::tree::{NodeRef, TreeStore};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn git(repo_path: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn commit_file(repo_path: &Path, file: &str, message: &str) {
    std::fs::write(repo_path.join(file), message).unwrap();
    git(repo_path, &["add", file]);
    git(repo_path, &["commit", "-m", message]);
}

/// master -> a -> b and master -> c, one commit per branch
fn create_stacked_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "-b", "master"]);
    git(&repo_path, &["config", "user.name", "Test"]);
    git(&repo_path, &["config", "user.email", "test@test.com"]);
    commit_file(&repo_path, "README.md", "Initial commit");

    git(&repo_path, &["checkout", "-b", "a"]);
    commit_file(&repo_path, "a.txt", "Add a");
    git(&repo_path, &["checkout", "-b", "b"]);
    commit_file(&repo_path, "b.txt", "Add b");
    git(&repo_path, &["checkout", "master"]);
    git(&repo_path, &["checkout", "-b", "c"]);
    commit_file(&repo_path, "c.txt", "Add c");
    git(&repo_path, &["checkout", "master"]);

    (temp_dir, repo_path)
}

fn stacked_store(repo_path: &Path) -> TreeStore {
    let mut store = TreeStore::open(&repo_path.join(".git_tree"), "master").unwrap();
    for name in ["a", "b", "c"] {
        store.create_node(Some(name)).unwrap();
    }
    for (parent, child) in [("master", "a"), ("a", "b"), ("master", "c")] {
        store
            .add_edge(&NodeRef::name(parent), &NodeRef::name(child))
            .unwrap();
    }
    store
}

fn orchestrator(repo_path: &Path) -> RebaseOrchestrator<GitRepository> {
    let repo = GitRepository::open(repo_path).unwrap();
    RebaseOrchestrator::with_resolved_names(stacked_store(repo_path), repo, "master").unwrap()
}

#[test]
fn test_rebase_moves_whole_stack_in_history_and_tree() {
    let (_tmp, repo_path) = create_stacked_repo();
    let mut orchestrator = orchestrator(&repo_path);

    let result = orchestrator
        .rebase(&NodeRef::name("a"), &NodeRef::name("c"))
        .unwrap();
    assert_eq!(result.steps.len(), 2);

    let repo = orchestrator.driver();
    assert_eq!(repo.rev_parse("a^").unwrap(), repo.rev_parse("c").unwrap());
    assert_eq!(repo.rev_parse("b^").unwrap(), repo.rev_parse("a").unwrap());
    assert_eq!(repo.current_branch().unwrap(), "b");
    assert!(repo_path.join("c.txt").exists());

    let reloaded = TreeStore::load(&repo_path.join(".git_tree")).unwrap();
    assert_eq!(
        reloaded.parent_branch(&NodeRef::name("a")).unwrap().as_deref(),
        Some("c")
    );
    assert_eq!(
        reloaded.parent_branch(&NodeRef::name("b")).unwrap().as_deref(),
        Some("a")
    );
}

#[test]
fn test_rebase_moves_tracked_branch_not_its_copy() {
    let (_tmp, repo_path) = create_stacked_repo();
    // Sorts before "a" and points at the same commit
    git(&repo_path, &["branch", "0-backup", "a"]);
    let mut orchestrator = orchestrator(&repo_path);

    let result = orchestrator
        .rebase(&NodeRef::name("a"), &NodeRef::name("c"))
        .unwrap();
    assert_eq!(result.steps[0].branch, "a");

    let repo = orchestrator.driver();
    assert_eq!(repo.rev_parse("a^").unwrap(), repo.rev_parse("c").unwrap());
    assert_eq!(
        repo.rev_parse("0-backup^").unwrap(),
        repo.rev_parse("master").unwrap()
    );

    let reloaded = TreeStore::load(&repo_path.join(".git_tree")).unwrap();
    assert_eq!(
        reloaded.parent_branch(&NodeRef::name("a")).unwrap().as_deref(),
        Some("c")
    );
}

#[test]
fn test_prune_deletes_branch_in_repository() {
    let (_tmp, repo_path) = create_stacked_repo();
    let mut orchestrator = orchestrator(&repo_path);

    orchestrator.prune("a").unwrap();

    let names: Vec<String> = orchestrator
        .driver()
        .branch_listing()
        .unwrap()
        .into_iter()
        .map(|tip| tip.name)
        .collect();
    assert_eq!(names, vec!["b", "c", "master"]);
    assert!(!orchestrator.store().contains("a"));
    assert_eq!(
        orchestrator.store().get_parent(&NodeRef::name("b")).unwrap(),
        None
    );
}

#[test]
fn test_amend_keeps_branch_under_parent() {
    let (_tmp, repo_path) = create_stacked_repo();
    let mut orchestrator = orchestrator(&repo_path);
    orchestrator.update("a").unwrap();
    let before = orchestrator.driver().rev_parse("a").unwrap();

    std::fs::write(repo_path.join("a.txt"), "Add a, amended").unwrap();
    git(&repo_path, &["add", "a.txt"]);
    orchestrator.amend().unwrap();

    let repo = orchestrator.driver();
    assert_ne!(repo.rev_parse("a").unwrap(), before);
    assert_eq!(repo.rev_parse("a^").unwrap(), repo.rev_parse("master").unwrap());
    assert_eq!(
        orchestrator.store().parent_branch(&NodeRef::name("a")).unwrap().as_deref(),
        Some("master")
    );
    assert_eq!(
        orchestrator.store().get_parent(&NodeRef::name("b")).unwrap(),
        None
    );
}

#[test]
fn test_rebase_conflict_stops_at_failing_branch() {
    let (_tmp, repo_path) = create_stacked_repo();
    // c rewrites the file a introduces, so replaying a onto c conflicts
    git(&repo_path, &["checkout", "c"]);
    commit_file(&repo_path, "a.txt", "Conflicting a");
    git(&repo_path, &["checkout", "master"]);
    let mut orchestrator = orchestrator(&repo_path);

    let err = orchestrator
        .rebase(&NodeRef::name("a"), &NodeRef::name("c"))
        .unwrap_err();
    assert!(matches!(
        err,
        stackforest::ForestError::ExternalCommandFailure { .. }
    ));

    let reloaded = TreeStore::load(&repo_path.join(".git_tree")).unwrap();
    assert_eq!(
        reloaded.parent_branch(&NodeRef::name("a")).unwrap().as_deref(),
        Some("master")
    );
    assert_eq!(
        reloaded.parent_branch(&NodeRef::name("b")).unwrap().as_deref(),
        Some("a")
    );
    git(&repo_path, &["rebase", "--abort"]);
}
