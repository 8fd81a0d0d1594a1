use crate::errors::{ForestError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Atomic file operations so an interrupted write never leaves a half-written tree file
pub mod atomic_file {
    use super::*;

    /// Write JSON data to a file atomically using a temporary file + rename strategy
    pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(data)?;
        write_string(path, &content)
    }

    /// Write string content to a file atomically using a temporary file + rename strategy
    pub fn write_string(path: &Path, content: &str) -> Result<()> {
        // Create temporary file in the same directory as the target
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, content)
            .map_err(|e| ForestError::config(format!("Failed to write temporary file: {e}")))?;

        atomic_rename(&temp_path, path)
    }

    #[cfg(windows)]
    fn atomic_rename(temp_path: &Path, final_path: &Path) -> Result<()> {
        // Windows refuses to rename over an existing file
        if final_path.exists() {
            fs::remove_file(final_path).map_err(|e| {
                ForestError::config(format!("Failed to replace {final_path:?}: {e}"))
            })?;
        }
        fs::rename(temp_path, final_path)
            .map_err(|e| ForestError::config(format!("Failed to finalize file write: {e}")))
    }

    #[cfg(not(windows))]
    fn atomic_rename(temp_path: &Path, final_path: &Path) -> Result<()> {
        fs::rename(temp_path, final_path)
            .map_err(|e| ForestError::config(format!("Failed to finalize file write: {e}")))
    }
}
