use super::TEMPLATES_NAME;
use crate::command::{
    CommandController, CommandFailure, CommandMetadata, InputDescriptor, ResultNode,
    ValidationMessage,
};
use crate::templates::TEMPLATES;
use serde_json::json;

pub const INPUT_PREFIX: &str = "prefix";

/// Read-only query over the scaffold templates.
#[derive(Debug, Default)]
pub struct TemplateCatalog {
    prefix: Option<String>,
}

impl CommandController for TemplateCatalog {
    fn initialize(&mut self) -> Result<(), CommandFailure> {
        self.prefix = None;
        Ok(())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: TEMPLATES_NAME.to_string(),
            description: "List the available project templates".to_string(),
            category: "Scaffold".to_string(),
            deprecated: false,
        }
    }

    fn inputs(&self) -> Vec<InputDescriptor> {
        vec![
            InputDescriptor::text(INPUT_PREFIX, "Prefix", false, self.prefix.as_deref())
                .with_description("Only list templates whose id starts with this"),
        ]
    }

    fn set_input(&mut self, name: &str, values: &[String]) {
        if name == INPUT_PREFIX {
            self.prefix = values
                .first()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty());
        }
    }

    fn validate(&mut self) -> Vec<ValidationMessage> {
        Vec::new()
    }

    fn execute(&mut self) -> Result<ResultNode, CommandFailure> {
        let prefix = self.prefix.as_deref().unwrap_or_default();
        let children: Vec<_> = TEMPLATES
            .iter()
            .filter(|template| template.id.starts_with(prefix))
            .map(|template| {
                ResultNode::entity(
                    json!({ "id": template.id, "description": template.description }),
                    template.id,
                )
            })
            .collect();
        if children.is_empty() {
            return Err(CommandFailure::new(format!(
                "No templates match prefix `{prefix}`"
            )));
        }
        Ok(ResultNode::composite(children))
    }
}
