//! Stack rebase module
//!
//! Replays structural changes of the branch forest through the VCS driver:
//! - Subtree rebase propagation
//! - Commit, amend, prune, rename and sync of single branches
//! - Adoption of branches the forest does not track yet

pub mod rebase;

pub use rebase::{next_available_branch_name, RebaseOrchestrator, RebaseResult, RebaseStep};
