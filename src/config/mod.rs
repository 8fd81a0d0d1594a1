pub mod settings;

pub use settings::Settings;

use crate::errors::{ForestError, Result};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".stackforest";
const CONFIG_FILE_NAME: &str = "config.json";

/// Get the user-wide configuration directory (~/.stackforest/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| ForestError::config("Could not find home directory"))?;
    Ok(home_dir.join(CONFIG_DIR_NAME))
}

/// Get the configuration directory for a specific repository
pub fn get_repo_config_dir(repo_path: &Path) -> PathBuf {
    repo_path.join(CONFIG_DIR_NAME)
}

/// Settings for a repository: the repository's own config file, else the
/// user-wide one, else defaults
pub fn load_settings(repo_path: &Path) -> Result<Settings> {
    let repo_config = get_repo_config_dir(repo_path).join(CONFIG_FILE_NAME);
    if repo_config.exists() {
        tracing::debug!("Using repository config {}", repo_config.display());
        return Settings::load_from_file(&repo_config);
    }

    if let Ok(global_dir) = get_config_dir() {
        let global_config = global_dir.join(CONFIG_FILE_NAME);
        if global_config.exists() {
            tracing::debug!("Using user config {}", global_config.display());
            return Settings::load_from_file(&global_config);
        }
    }

    Ok(Settings::default())
}

/// Write the repository's config file
pub fn save_repo_settings(repo_path: &Path, settings: &Settings) -> Result<()> {
    settings.save_to_file(&get_repo_config_dir(repo_path).join(CONFIG_FILE_NAME))
}

/// Check if a repository is initialized (its tree file exists)
pub fn is_repo_initialized(repo_path: &Path, settings: &Settings) -> bool {
    settings.tree_path(repo_path).exists()
}
