use super::open_orchestrator;
use crate::cli::output::Output;
use crate::errors::Result;

/// Commit outstanding changes as a new branch on top of the current one
pub fn commit(branch_name: Option<String>) -> Result<()> {
    let mut orchestrator = open_orchestrator()?;
    let name = orchestrator.commit(branch_name)?;
    Output::success(format!("Created branch {name}"));
    Ok(())
}

/// Amend the current branch
pub fn amend() -> Result<()> {
    let mut orchestrator = open_orchestrator()?;
    orchestrator.amend()?;
    Output::success("Amended current branch");
    Ok(())
}

/// Delete a branch, promoting its children to roots
pub fn prune(branch_name: &str) -> Result<()> {
    let mut orchestrator = open_orchestrator()?;
    orchestrator.prune(branch_name)?;
    Output::success(format!("Deleted branch {branch_name}"));
    Ok(())
}

/// Switch to a branch
pub fn update(branch_name: &str) -> Result<()> {
    let mut orchestrator = open_orchestrator()?;
    orchestrator.update(branch_name)
}

/// Rename the current branch
pub fn rename(new_name: Option<String>) -> Result<()> {
    let mut orchestrator = open_orchestrator()?;
    let name = orchestrator.rename_current(new_name)?;
    Output::success(format!("Current branch renamed to {name}"));
    Ok(())
}
