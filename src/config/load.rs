use super::{default_global_config_path, default_state_root_path, ConfigError, Settings};
use std::path::Path;

/// Reads and validates a settings file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let settings = Settings::from_path(path)?;
    settings.validate()?;
    Ok(settings)
}

/// `$HOME/.cmdhost/config.yaml`, or the built-in defaults rooted at
/// `$HOME/.cmdhost` when that file does not exist.
pub fn load_global_settings() -> Result<Settings, ConfigError> {
    let path = default_global_config_path()?;
    if !path.exists() {
        let settings = Settings::with_state_root(default_state_root_path()?);
        settings.validate()?;
        return Ok(settings);
    }
    load_settings(&path)
}
