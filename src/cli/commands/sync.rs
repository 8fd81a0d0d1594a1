use super::open_orchestrator;
use crate::cli::output::Output;
use crate::errors::Result;

/// Pull the trunk branch from its remote
pub fn run() -> Result<()> {
    let mut orchestrator = open_orchestrator()?;
    orchestrator.sync()?;
    Output::success("Trunk synced from remote");
    Output::tip("Use `sf rebase -s <branch> -d <trunk>` to move stacks onto the new trunk");
    Ok(())
}
