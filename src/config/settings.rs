use crate::errors::{ForestError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Branch that `sync` pulls and that a fresh tree starts from
    pub trunk_branch: String,
    /// Tree file location, relative to the repository root unless absolute
    pub tree_file: PathBuf,
    /// Echo every git command the tool runs
    pub verbose_commands: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trunk_branch: "master".to_string(),
            tree_file: PathBuf::from(".git_tree"),
            verbose_commands: false,
        }
    }
}

impl Settings {
    /// Default settings with an explicit trunk branch
    pub fn default_for_repo(trunk_branch: Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(trunk) = trunk_branch {
            settings.trunk_branch = trunk;
        }
        settings
    }

    /// Load settings from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ForestError::config(format!("Failed to read config file: {e}")))?;

        serde_json::from_str(&content)
            .map_err(|e| ForestError::config(format!("Failed to parse config file: {e}")))
    }

    /// Save settings to a file atomically
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ForestError::config(format!("Failed to create config directory: {e}"))
            })?;
        }
        crate::utils::atomic_file::write_json(path, self)
    }

    /// Absolute path of the tree file for a repository
    pub fn tree_path(&self, repo_root: &Path) -> PathBuf {
        if self.tree_file.is_absolute() {
            self.tree_file.clone()
        } else {
            repo_root.join(&self.tree_file)
        }
    }

    /// Update a setting by dotted key
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "trunk_branch" => self.trunk_branch = value.to_string(),
            "tree_file" => self.tree_file = PathBuf::from(value),
            "verbose_commands" => {
                self.verbose_commands = value
                    .parse()
                    .map_err(|_| ForestError::config(format!("Invalid boolean value: {value}")))?
            }
            _ => return Err(ForestError::config(format!("Unknown config key: {key}"))),
        }
        Ok(())
    }

    /// Read a setting by key
    pub fn get_value(&self, key: &str) -> Result<String> {
        match key {
            "trunk_branch" => Ok(self.trunk_branch.clone()),
            "tree_file" => Ok(self.tree_file.display().to_string()),
            "verbose_commands" => Ok(self.verbose_commands.to_string()),
            _ => Err(ForestError::config(format!("Unknown config key: {key}"))),
        }
    }
}
