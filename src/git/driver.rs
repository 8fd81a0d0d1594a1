use crate::errors::Result;
use serde::{Deserialize, Serialize};

/// A local branch and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTip {
    pub name: String,
    pub commit: String,
}

/// Primitive version-control operations the branch forest is replayed through.
///
/// Every call blocks until the underlying command finishes. Failing calls
/// return [`crate::errors::ForestError::ExternalCommandFailure`] naming the
/// step and its exit status.
pub trait VcsDriver {
    /// Name of the checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Switch the working tree to an existing branch
    fn checkout(&self, name: &str) -> Result<()>;

    /// Create a branch at HEAD and switch to it
    fn create_branch_and_switch(&self, name: &str) -> Result<()>;

    /// Commit outstanding changes, opening the user's editor for the message
    fn commit_interactive(&self) -> Result<()>;

    /// Fold outstanding changes into HEAD keeping its message
    fn amend_no_edit(&self) -> Result<()>;

    /// Replay the tip commit of the current branch onto `new_base`
    fn rebase_onto(&self, new_base: &str) -> Result<()>;

    /// Force-delete a local branch
    fn delete_branch(&self, name: &str) -> Result<()>;

    /// Rename the checked-out branch
    fn rename_current_branch(&self, new_name: &str) -> Result<()>;

    /// All local branches with their tips, sorted by name
    fn branch_listing(&self) -> Result<Vec<BranchTip>>;

    /// Full commit id of a revision expression
    fn rev_parse(&self, rev: &str) -> Result<String>;

    /// Pull the current branch from its upstream
    fn pull(&self) -> Result<()>;

    /// Run `git <tool> <base> <extra_args..>` with the terminal attached
    fn diff(&self, tool: DiffTool, base: &str, extra_args: &[String]) -> Result<()>;

    /// One-line description of a branch tip for tree listings
    fn commit_subject(&self, name: &str) -> Result<String>;
}

/// Which git diff front end to run against the parent branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTool {
    Diff,
    Difftool,
}

impl DiffTool {
    pub fn as_git_command(&self) -> &'static str {
        match self {
            DiffTool::Diff => "diff",
            DiffTool::Difftool => "difftool",
        }
    }
}
