pub mod cli;
pub mod config;
pub mod errors;
pub mod git;
pub mod stack;
pub mod tree;
pub mod utils;

pub use errors::ForestError;
