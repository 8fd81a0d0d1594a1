use super::open_orchestrator;
use crate::errors::Result;

/// Show the branch tree
pub fn run() -> Result<()> {
    let orchestrator = open_orchestrator()?;
    print!("{}", orchestrator.render_tree());
    Ok(())
}
