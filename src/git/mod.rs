pub mod driver;
pub mod repository;

pub use driver::{BranchTip, DiffTool, VcsDriver};
pub use repository::GitRepository;

use crate::errors::{ForestError, Result};
use std::path::{Path, PathBuf};

/// Find the root of the Git repository
pub fn find_repository_root(start_path: &Path) -> Result<PathBuf> {
    let repo = git2::Repository::discover(start_path)
        .map_err(|e| ForestError::config(format!("Not a git repository: {e}")))?;

    let workdir = repo
        .workdir()
        .ok_or_else(|| ForestError::config("Repository has no working directory (bare repo?)"))?;

    Ok(workdir.to_path_buf())
}
