pub mod branch;
pub mod completions;
pub mod config;
pub mod diff;
pub mod init;
pub mod rebase;
pub mod sync;
pub mod tree;

use crate::config::{load_settings, Settings};
use crate::errors::{ForestError, Result};
use crate::git::{find_repository_root, GitRepository};
use crate::stack::RebaseOrchestrator;
use crate::tree::TreeStore;
use std::env;
use std::path::PathBuf;

/// Repository root and its settings for the current directory
pub(crate) fn current_workspace() -> Result<(PathBuf, Settings)> {
    let current_dir = env::current_dir()
        .map_err(|e| ForestError::config(format!("Could not get current directory: {e}")))?;
    let repo_root = find_repository_root(&current_dir)?;
    let settings = load_settings(&repo_root)?;
    Ok((repo_root, settings))
}

/// Open the tree (bootstrapping it on first use) and snapshot branch aliases
pub(crate) fn open_orchestrator() -> Result<RebaseOrchestrator<GitRepository>> {
    let (repo_root, settings) = current_workspace()?;
    let driver =
        GitRepository::open(&repo_root)?.with_verbose_commands(settings.verbose_commands);
    let store = TreeStore::open(&settings.tree_path(&repo_root), &settings.trunk_branch)?;
    tracing::debug!(
        "Opened tree with {} nodes from {}",
        store.node_count(),
        settings.tree_path(&repo_root).display()
    );
    RebaseOrchestrator::with_resolved_names(store, driver, settings.trunk_branch)
}
