use super::open_orchestrator;
use crate::errors::Result;
use crate::git::DiffTool;

/// Diff the working tree against the current branch's parent
pub fn run(tool: DiffTool, args: &[String]) -> Result<()> {
    let orchestrator = open_orchestrator()?;
    orchestrator.diff_parent(tool, args)
}
