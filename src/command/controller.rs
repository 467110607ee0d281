use super::result::ResultNode;
use crate::cluster::ClusterError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMetadata {
    pub name: String,
    pub description: String,
    pub category: String,
    pub deprecated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub severity: Severity,
}

impl ValidationMessage {
    pub fn error(input: Option<&str>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            input: input.map(str::to_string),
            severity: Severity::Error,
        }
    }

    pub fn warn(input: Option<&str>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            input: input.map(str::to_string),
            severity: Severity::Warn,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub name: String,
    pub label: String,
    pub description: String,
    pub required: bool,
    pub enabled: bool,
    pub value_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value_choices: Vec<String>,
    pub value: Value,
}

impl InputDescriptor {
    pub fn text(name: &str, label: &str, required: bool, value: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            description: String::new(),
            required,
            enabled: true,
            value_type: "string".to_string(),
            value_choices: Vec::new(),
            value: value.map(Value::from).unwrap_or(Value::Null),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.value_choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// The state block rendered by describe/validate/step responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentState {
    pub valid: bool,
    pub can_execute: bool,
    pub wizard: bool,
    pub can_move_to_next_step: bool,
    pub can_move_to_previous_step: bool,
}

/// A command signalled failure, either from its own logic or from a
/// collaborator such as the cluster client.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CommandFailure {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CommandFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<ClusterError> for CommandFailure {
    fn from(value: ClusterError) -> Self {
        Self::with_source(value.to_string(), value)
    }
}

impl From<std::io::Error> for CommandFailure {
    fn from(value: std::io::Error) -> Self {
        Self::with_source(format!("io error: {value}"), value)
    }
}

/// Per-request attributes handed to command implementations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub workspace_root: PathBuf,
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl RequestContext {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, values: Vec<String>) -> Self {
        self.attributes.insert(name.to_string(), values);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

/// Step capability of multi-step commands.
pub trait WizardSteps {
    fn can_move_to_next_step(&mut self) -> bool;

    fn can_move_to_previous_step(&self) -> bool;

    /// Moves forward one step and initializes it.
    fn next_step(&mut self) -> Result<(), CommandFailure>;
}

pub trait CommandController: Send {
    fn initialize(&mut self) -> Result<(), CommandFailure>;

    fn metadata(&self) -> CommandMetadata;

    /// Input descriptors for the current step.
    fn inputs(&self) -> Vec<InputDescriptor>;

    /// Applies a value to the current step. Unknown names are the
    /// implementation's call; built-ins ignore them.
    fn set_input(&mut self, name: &str, values: &[String]);

    fn validate(&mut self) -> Vec<ValidationMessage>;

    fn execute(&mut self) -> Result<ResultNode, CommandFailure>;

    /// Filesystem selection left behind by a successful execution.
    fn artifact_path(&self) -> Option<PathBuf> {
        None
    }

    fn wizard(&mut self) -> Option<&mut dyn WizardSteps> {
        None
    }

    fn close(&mut self) {}
}

/// Resolves a command label to a fresh controller for one request.
pub trait CommandFactory: Send + Sync {
    fn create(
        &self,
        label: &str,
        context: &RequestContext,
    ) -> Result<Box<dyn CommandController>, CommandFailure>;
}
