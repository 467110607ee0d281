//! Scaffolding commands shipped with the engine.

pub mod catalog;
pub mod project;
pub mod quickstart;

use crate::command::{
    CommandController, CommandFactory, CommandFailure, InputDescriptor, RequestContext,
    ResultNode, ValidationMessage,
};
use crate::shared::ids::{generate_workspace_id, validate_identifier_value};
use crate::shared::time::now_secs;
use crate::templates::{find_template, template_ids, write_scaffold, DEFAULT_TEMPLATE_ID};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use catalog::TemplateCatalog;
pub use project::NewProject;
pub use quickstart::NewQuickstart;

pub const QUICKSTART_NAME: &str = "new-quickstart";
pub const QUICKSTART_LABEL: &str = "Scaffold: New Quickstart";
pub const PROJECT_NAME: &str = "new-project";
pub const PROJECT_LABEL: &str = "Scaffold: New Project";
pub const TEMPLATES_NAME: &str = "list-templates";
pub const TEMPLATES_LABEL: &str = "Scaffold: List Templates";

pub const DEFAULT_PROJECT_VERSION: &str = "0.1.0";

pub const INPUT_NAMED: &str = "named";
pub const INPUT_DESCRIPTION: &str = "description";
pub const INPUT_TEMPLATE: &str = "template";
pub const INPUT_VERSION: &str = "version";

/// Request attribute naming the caller; stamped into generated manifests.
pub const CLIENT_ATTRIBUTE: &str = "client";
pub const DEFAULT_GENERATOR: &str = "cmdhost";

/// Maps registry labels to the built-in controllers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCommandFactory;

impl CommandFactory for BuiltinCommandFactory {
    fn create(
        &self,
        label: &str,
        context: &RequestContext,
    ) -> Result<Box<dyn CommandController>, CommandFailure> {
        let root = context.workspace_root().to_path_buf();
        let generator = generator_name(context);
        match label {
            QUICKSTART_LABEL => Ok(Box::new(
                NewQuickstart::new(root).with_generator(generator),
            )),
            PROJECT_LABEL => Ok(Box::new(NewProject::new(root).with_generator(generator))),
            TEMPLATES_LABEL => Ok(Box::new(TemplateCatalog::default())),
            other => Err(CommandFailure::new(format!(
                "no command labelled `{other}`"
            ))),
        }
    }
}

fn generator_name(context: &RequestContext) -> &str {
    context
        .attribute(CLIENT_ATTRIBUTE)
        .and_then(|values| values.first())
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_GENERATOR)
}

fn first_trimmed(values: &[String]) -> Option<String> {
    values
        .first()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Input values shared by the scaffolding commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScaffoldRequest {
    pub named: Option<String>,
    pub description: Option<String>,
    pub template: String,
    pub version: String,
}

impl Default for ScaffoldRequest {
    fn default() -> Self {
        Self {
            named: None,
            description: None,
            template: DEFAULT_TEMPLATE_ID.to_string(),
            version: DEFAULT_PROJECT_VERSION.to_string(),
        }
    }
}

impl ScaffoldRequest {
    /// Returns false when `name` is not a scaffold input.
    pub fn set(&mut self, name: &str, values: &[String]) -> bool {
        match name {
            INPUT_NAMED => self.named = first_trimmed(values),
            INPUT_DESCRIPTION => self.description = first_trimmed(values),
            INPUT_TEMPLATE => {
                self.template =
                    first_trimmed(values).unwrap_or_else(|| DEFAULT_TEMPLATE_ID.to_string())
            }
            INPUT_VERSION => {
                self.version =
                    first_trimmed(values).unwrap_or_else(|| DEFAULT_PROJECT_VERSION.to_string())
            }
            _ => return false,
        }
        true
    }

    pub fn named_input(&self) -> InputDescriptor {
        InputDescriptor::text(INPUT_NAMED, "Name", true, self.named.as_deref())
            .with_description("Project name; also names the produced archive")
    }

    pub fn description_input(&self) -> InputDescriptor {
        InputDescriptor::text(
            INPUT_DESCRIPTION,
            "Description",
            false,
            self.description.as_deref(),
        )
    }

    pub fn template_input(&self) -> InputDescriptor {
        InputDescriptor::text(INPUT_TEMPLATE, "Template", true, Some(self.template.as_str()))
            .with_choices(&template_ids())
    }

    pub fn version_input(&self) -> InputDescriptor {
        InputDescriptor::text(INPUT_VERSION, "Version", false, Some(self.version.as_str()))
    }

    pub fn validate_named(&self, messages: &mut Vec<ValidationMessage>) {
        match self.named.as_deref() {
            None => messages.push(ValidationMessage::error(
                Some(INPUT_NAMED),
                "Name is required",
            )),
            Some(named) => {
                if let Err(reason) = validate_identifier_value("name", named) {
                    messages.push(ValidationMessage::error(Some(INPUT_NAMED), reason));
                }
            }
        }
        if self.description.is_none() {
            messages.push(ValidationMessage::warn(
                Some(INPUT_DESCRIPTION),
                "No description given; README will be left bare",
            ));
        }
    }

    pub fn validate_template(&self, messages: &mut Vec<ValidationMessage>) {
        if find_template(&self.template).is_none() {
            messages.push(ValidationMessage::error(
                Some(INPUT_TEMPLATE),
                format!("Unknown template `{}`", self.template),
            ));
        }
    }

    /// Renders the selected template into a fresh workspace directory under
    /// `workspace_root` and returns that directory with one result per file.
    pub fn generate(
        &self,
        workspace_root: &Path,
        generator: &str,
    ) -> Result<(PathBuf, ResultNode), CommandFailure> {
        let named = self
            .named
            .as_deref()
            .ok_or_else(|| CommandFailure::new("Name is required"))?;
        let template = find_template(&self.template).ok_or_else(|| {
            CommandFailure::new(format!("Unknown template `{}`", self.template))
        })?;

        let workspace_id = generate_workspace_id(now_secs()).map_err(CommandFailure::new)?;
        let workspace = workspace_root.join(workspace_id);
        fs::create_dir_all(&workspace).map_err(|err| {
            CommandFailure::with_source(
                format!("failed to create workspace {}", workspace.display()),
                err,
            )
        })?;

        let values = BTreeMap::from_iter([
            (INPUT_NAMED, named.to_string()),
            (
                INPUT_DESCRIPTION,
                self.description.clone().unwrap_or_default(),
            ),
            (INPUT_VERSION, self.version.clone()),
            ("generator", generator.to_string()),
        ]);
        let written = match write_scaffold(template, &workspace, &values) {
            Ok(written) => written,
            Err(err) => {
                let _ = fs::remove_dir_all(&workspace);
                return Err(err);
            }
        };

        let children = written
            .iter()
            .map(|file| {
                let file = file.display().to_string();
                let message = format!("Created {file}");
                ResultNode::entity(json!(file), message)
            })
            .collect();
        Ok((workspace, ResultNode::composite(children)))
    }
}
