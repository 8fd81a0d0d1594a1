//! Branch forest module
//!
//! - Persistent forest of slots with index reuse (`store`)
//! - External branch aliases onto logical nodes (`resolver`)
//! - Read-only tree rendering for the `xl` view (`printer`)

pub mod printer;
pub mod resolver;
pub mod store;

pub use printer::TreePrinter;
pub use resolver::NameResolver;
pub use store::{NodeRef, PersistedTree, TreeStore};
