use super::open_orchestrator;
use crate::cli::output::Output;
use crate::errors::{ForestError, Result};
use crate::tree::NodeRef;

/// Rebase `source` and its whole chain onto `dest`
pub fn run(source: &str, dest: &str) -> Result<()> {
    let mut orchestrator = open_orchestrator()?;

    match orchestrator.rebase(&NodeRef::name(source), &NodeRef::name(dest)) {
        Ok(result) => {
            for step in &result.steps {
                Output::sub_item(format!("{} → {}", step.branch, step.onto));
            }
            Output::success(result.summary());
            Ok(())
        }
        Err(e @ ForestError::ExternalCommandFailure { .. }) => {
            Output::error(format!("Rebase stopped: {e}"));
            Output::tip("Branches rebased before the failing step are already recorded in the tree");
            Output::tip("Resolve the rebase in git, then rerun `sf rebase` for the remaining branches");
            Err(e)
        }
        Err(e) => Err(e),
    }
}
