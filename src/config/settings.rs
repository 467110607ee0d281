use super::ConfigError;
use crate::builtin;
use crate::registry::{CommandDescriptor, CommandKind, CommandRegistry};
use crate::shared::ids::validate_identifier_value;
use crate::shared::logging::engine_log_path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ARCHIVE_ID: &str = "demo";
pub const DEFAULT_FRAMEWORK_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArchiveSettings {
    /// Archive base name when the request carries no `named` input.
    #[serde(default = "default_archive_id")]
    pub default_id: String,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            default_id: default_archive_id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    pub state_root: PathBuf,
    #[serde(default = "default_framework_version")]
    pub framework_version: String,
    #[serde(default)]
    pub default_command: Option<String>,
    #[serde(default)]
    pub archive: ArchiveSettings,
    #[serde(default = "default_commands")]
    pub commands: Vec<CommandDescriptor>,
}

fn default_archive_id() -> String {
    DEFAULT_ARCHIVE_ID.to_string()
}

fn default_framework_version() -> String {
    DEFAULT_FRAMEWORK_VERSION.to_string()
}

pub fn default_commands() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor {
            name: builtin::QUICKSTART_NAME.to_string(),
            label: builtin::QUICKSTART_LABEL.to_string(),
            kind: CommandKind::Archive,
        },
        CommandDescriptor {
            name: builtin::PROJECT_NAME.to_string(),
            label: builtin::PROJECT_LABEL.to_string(),
            kind: CommandKind::Archive,
        },
        CommandDescriptor {
            name: builtin::TEMPLATES_NAME.to_string(),
            label: builtin::TEMPLATES_LABEL.to_string(),
            kind: CommandKind::Query,
        },
    ]
}

impl Settings {
    pub fn with_state_root(state_root: impl Into<PathBuf>) -> Self {
        Self {
            state_root: state_root.into(),
            framework_version: default_framework_version(),
            default_command: Some(builtin::QUICKSTART_NAME.to_string()),
            archive: ArchiveSettings::default(),
            commands: default_commands(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.state_root.as_os_str().is_empty() {
            return Err(ConfigError::Settings(
                "state_root must be non-empty".to_string(),
            ));
        }
        validate_identifier_value("archive.default_id", &self.archive.default_id)
            .map_err(ConfigError::Settings)?;

        let mut seen = BTreeSet::new();
        for command in &self.commands {
            if !seen.insert(command.name.as_str()) {
                return Err(ConfigError::Settings(format!(
                    "command `{}` is declared more than once",
                    command.name
                )));
            }
        }

        if let Some(default_command) = &self.default_command {
            if !seen.contains(default_command.as_str()) {
                return Err(ConfigError::Settings(format!(
                    "default_command `{default_command}` is not a declared command"
                )));
            }
        }
        Ok(())
    }

    pub fn build_registry(&self) -> Result<CommandRegistry, ConfigError> {
        CommandRegistry::builder()
            .extend(self.commands.iter().cloned())
            .build()
    }

    /// Scratch space where commands create their artifacts.
    pub fn workspaces_dir(&self) -> PathBuf {
        self.state_root.join("workspaces")
    }

    pub fn log_path(&self) -> PathBuf {
        engine_log_path(&self.state_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_fills_defaults() {
        let settings: Settings = serde_yaml::from_str("state_root: /tmp/cmdhost\n").expect("yaml");
        assert_eq!(settings.framework_version, DEFAULT_FRAMEWORK_VERSION);
        assert_eq!(settings.archive.default_id, "demo");
        assert_eq!(settings.commands, default_commands());
        assert_eq!(settings.default_command, None);
        assert_eq!(
            settings.workspaces_dir(),
            PathBuf::from("/tmp/cmdhost/workspaces")
        );
    }

    #[test]
    fn validate_rejects_duplicate_commands() {
        let mut settings = Settings::with_state_root("/tmp/cmdhost");
        settings.commands.push(settings.commands[0].clone());
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn validate_rejects_unknown_default_command() {
        let mut settings = Settings::with_state_root("/tmp/cmdhost");
        settings.default_command = Some("missing".to_string());
        let err = settings.validate().unwrap_err();
        assert!(err
            .to_string()
            .contains("default_command `missing` is not a declared command"));
    }

    #[test]
    fn validate_rejects_archive_ids_that_are_not_identifiers() {
        let mut settings = Settings::with_state_root("/tmp/cmdhost");
        settings.archive.default_id = "../out".to_string();
        let err = settings.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            ConfigError::Settings(
                "archive.default_id must use only ASCII letters, digits, '-' or '_'".to_string()
            )
            .to_string()
        );
    }
}
