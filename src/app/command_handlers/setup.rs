use crate::app::cli::CliInvocation;
use crate::config::{
    bootstrap_state_root, default_global_config_path, default_state_root_path, load_settings,
    save_settings, Settings,
};
use std::path::{Path, PathBuf};

fn state_root_for(config_path: &Path, explicit: bool) -> Result<PathBuf, String> {
    if explicit {
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            return Ok(parent.to_path_buf());
        }
    }
    default_state_root_path().map_err(|err| err.to_string())
}

/// Writes the default settings file when missing and creates the state
/// directories. An existing settings file is validated and left untouched.
pub fn cmd_setup(invocation: &CliInvocation) -> Result<String, String> {
    let (config_path, explicit) = match &invocation.config {
        Some(path) => (path.clone(), true),
        None => (
            default_global_config_path().map_err(|err| err.to_string())?,
            false,
        ),
    };

    let settings = if config_path.exists() {
        load_settings(&config_path).map_err(|err| err.to_string())?
    } else {
        let settings = Settings::with_state_root(state_root_for(&config_path, explicit)?);
        save_settings(&settings, &config_path).map_err(|err| err.to_string())?;
        settings
    };
    bootstrap_state_root(&settings).map_err(|err| err.to_string())?;

    Ok(format!(
        "setup complete\nconfig={}\nstate_root={}",
        config_path.display(),
        settings.state_root.display()
    ))
}
