use super::current_workspace;
use crate::cli::output::Output;
use crate::cli::ConfigAction;
use crate::config::{load_settings, save_repo_settings};
use crate::errors::Result;
use std::path::Path;

/// Handle configuration commands against the repository's config file
pub fn run(action: ConfigAction) -> Result<()> {
    let (repo_root, _) = current_workspace()?;

    match action {
        ConfigAction::Set { key, value } => set_config_value(&repo_root, &key, &value),
        ConfigAction::Get { key } => get_config_value(&repo_root, &key),
        ConfigAction::List => list_config_values(&repo_root),
    }
}

fn set_config_value(repo_root: &Path, key: &str, value: &str) -> Result<()> {
    let mut settings = load_settings(repo_root)?;
    settings.set_value(key, value)?;
    save_repo_settings(repo_root, &settings)?;

    Output::success(format!("Configuration updated: {key} = {value}"));
    if key == "tree_file" {
        Output::tip("The existing tree file is not moved; copy it to the new location to keep it");
    }
    Ok(())
}

fn get_config_value(repo_root: &Path, key: &str) -> Result<()> {
    let settings = load_settings(repo_root)?;
    println!("{}", settings.get_value(key)?);
    Ok(())
}

fn list_config_values(repo_root: &Path) -> Result<()> {
    let settings = load_settings(repo_root)?;
    for key in ["trunk_branch", "tree_file", "verbose_commands"] {
        println!("{key} = {}", settings.get_value(key)?);
    }
    Ok(())
}
