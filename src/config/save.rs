use super::{ConfigError, Settings};
use std::fs;
use std::path::Path;

fn create_parent_dir(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }
    Ok(())
}

pub fn save_settings(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    settings.validate()?;
    create_parent_dir(path)?;
    let body = serde_yaml::to_string(settings).map_err(|source| ConfigError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, body).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Creates the state root, workspace and log directories.
pub fn bootstrap_state_root(settings: &Settings) -> Result<(), ConfigError> {
    for dir in [
        settings.state_root.clone(),
        settings.workspaces_dir(),
        settings.state_root.join("logs"),
    ] {
        fs::create_dir_all(&dir).map_err(|source| ConfigError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;
    }
    Ok(())
}
