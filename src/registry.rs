use crate::config::ConfigError;
use crate::shared::ids::validate_identifier_value;
use crate::shared::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Executable through the POST-style operations only.
    #[default]
    Command,
    /// Also executable through the query-parameter operation.
    Query,
    /// Execution yields a filesystem artifact packaged as a downloadable archive.
    Archive,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Query => "query",
            Self::Archive => "archive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub kind: CommandKind,
}

/// Name → label table fixed at startup. Queries and archive commands are
/// subsets of the command names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRegistry {
    commands: BTreeMap<String, String>,
    queries: BTreeSet<String>,
    archives: BTreeSet<String>,
}

impl CommandRegistry {
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::default()
    }

    pub fn label_of(&self, name: &str) -> Option<&str> {
        self.commands.get(name).map(String::as_str)
    }

    pub fn is_known_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn is_known_query(&self, name: &str) -> bool {
        self.queries.contains(name)
    }

    pub fn is_archive_producing(&self, name: &str) -> bool {
        self.archives.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        self.commands
            .iter()
            .map(|(name, label)| CommandDescriptor {
                name: name.clone(),
                label: label.clone(),
                kind: self.kind_of(name),
            })
            .collect()
    }

    fn kind_of(&self, name: &str) -> CommandKind {
        if self.archives.contains(name) {
            CommandKind::Archive
        } else if self.queries.contains(name) {
            CommandKind::Query
        } else {
            CommandKind::Command
        }
    }

    pub fn validate_command(&self, name: &str) -> Result<(), EngineError> {
        if self.commands.contains_key(name) {
            return Ok(());
        }
        if self.commands.is_empty() {
            return Err(EngineError::NoCommandsSupported);
        }
        Err(EngineError::UnknownCommand {
            name: name.to_string(),
            supported: self.commands.keys().cloned().collect(),
        })
    }

    pub fn validate_query(&self, name: &str) -> Result<(), EngineError> {
        if self.queries.contains(name) {
            return Ok(());
        }
        if self.queries.is_empty() {
            return Err(EngineError::NoQueriesSupported);
        }
        Err(EngineError::UnknownQuery {
            name: name.to_string(),
            supported: self.queries.iter().cloned().collect(),
        })
    }

    pub fn validate_archive_command(&self, name: &str) -> Result<(), EngineError> {
        if self.archives.contains(name) {
            return Ok(());
        }
        if self.archives.is_empty() {
            return Err(EngineError::NoArchiveCommandsSupported);
        }
        Err(EngineError::UnknownArchiveCommand {
            name: name.to_string(),
            supported: self.archives.iter().cloned().collect(),
        })
    }
}

#[derive(Debug, Default)]
pub struct CommandRegistryBuilder {
    entries: Vec<CommandDescriptor>,
}

impl CommandRegistryBuilder {
    /// Later registrations of the same name overwrite earlier ones.
    pub fn register(mut self, name: &str, label: &str, kind: CommandKind) -> Self {
        self.entries.push(CommandDescriptor {
            name: name.to_string(),
            label: label.to_string(),
            kind,
        });
        self
    }

    pub fn command(self, name: &str, label: &str) -> Self {
        self.register(name, label, CommandKind::Command)
    }

    pub fn query(self, name: &str, label: &str) -> Self {
        self.register(name, label, CommandKind::Query)
    }

    pub fn archive_command(self, name: &str, label: &str) -> Self {
        self.register(name, label, CommandKind::Archive)
    }

    pub fn extend(mut self, descriptors: impl IntoIterator<Item = CommandDescriptor>) -> Self {
        self.entries.extend(descriptors);
        self
    }

    pub fn build(self) -> Result<CommandRegistry, ConfigError> {
        let mut registry = CommandRegistry::default();
        for entry in self.entries {
            validate_identifier_value("command name", &entry.name).map_err(|reason| {
                ConfigError::Registry(format!("invalid command `{}`: {reason}", entry.name))
            })?;
            let label = entry.label.trim();
            if label.is_empty() {
                return Err(ConfigError::Registry(format!(
                    "command `{}` must have a non-empty label",
                    entry.name
                )));
            }

            registry.queries.remove(&entry.name);
            registry.archives.remove(&entry.name);
            match entry.kind {
                CommandKind::Command => {}
                CommandKind::Query => {
                    registry.queries.insert(entry.name.clone());
                }
                CommandKind::Archive => {
                    registry.archives.insert(entry.name.clone());
                }
            }
            registry.commands.insert(entry.name, label.to_string());
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwriting_a_name_replaces_label_and_kind() {
        let registry = CommandRegistry::builder()
            .archive_command("scaffold", "Scaffold")
            .query("scaffold", "Scaffold Query")
            .build()
            .expect("registry");
        assert_eq!(registry.label_of("scaffold"), Some("Scaffold Query"));
        assert!(registry.is_known_query("scaffold"));
        assert!(!registry.is_archive_producing("scaffold"));
    }

    #[test]
    fn build_rejects_blank_labels_and_bad_names() {
        let err = CommandRegistry::builder()
            .command("ok", "  ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("non-empty label"));

        let err = CommandRegistry::builder()
            .command("has space", "Label")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("invalid command `has space`"));
    }

    #[test]
    fn descriptors_report_kinds() {
        let registry = CommandRegistry::builder()
            .command("plain", "Plain")
            .query("list", "List")
            .archive_command("zip", "Zip")
            .build()
            .expect("registry");
        let kinds: Vec<CommandKind> = registry.descriptors().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![CommandKind::Query, CommandKind::Command, CommandKind::Archive]
        );
    }
}
