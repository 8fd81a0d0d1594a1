use super::current_workspace;
use crate::cli::output::Output;
use crate::config::{is_repo_initialized, save_repo_settings};
use crate::errors::Result;
use crate::git::GitRepository;
use crate::stack::RebaseOrchestrator;
use crate::tree::TreeStore;

/// Initialize the branch tree for the current repository
pub fn run(trunk: Option<String>, adopt: bool) -> Result<()> {
    tracing::info!("Initializing branch tree...");

    let (repo_root, mut settings) = current_workspace()?;
    if let Some(trunk) = trunk {
        settings.trunk_branch = trunk;
        save_repo_settings(&repo_root, &settings)?;
    }

    let tree_path = settings.tree_path(&repo_root);
    if is_repo_initialized(&repo_root, &settings) {
        Output::info(format!("Tree file already exists at {}", tree_path.display()));
    }
    let store = TreeStore::open(&tree_path, &settings.trunk_branch)?;

    if adopt {
        let driver =
            GitRepository::open(&repo_root)?.with_verbose_commands(settings.verbose_commands);
        let mut orchestrator =
            RebaseOrchestrator::with_resolved_names(store, driver, &settings.trunk_branch)?;
        let adopted = orchestrator.adopt_branches()?;
        for name in &adopted {
            Output::sub_item(format!("Tracking {name}"));
        }
        Output::success(format!("Adopted {} existing branches", adopted.len()));
    }

    Output::success(format!(
        "Branch tree ready at {} (trunk: {})",
        tree_path.display(),
        settings.trunk_branch
    ));
    Output::tip("Run `sf commit` to stack a new branch on top of the current one");
    Ok(())
}
