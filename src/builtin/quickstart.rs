use super::{ScaffoldRequest, DEFAULT_GENERATOR, QUICKSTART_NAME};
use crate::command::{
    CommandController, CommandFailure, CommandMetadata, InputDescriptor, ResultNode,
    ValidationMessage,
};
use std::path::PathBuf;

/// Single-step scaffold: every input is on one page.
#[derive(Debug)]
pub struct NewQuickstart {
    workspace_root: PathBuf,
    request: ScaffoldRequest,
    generator: String,
    generated: Option<PathBuf>,
}

impl NewQuickstart {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self {
            workspace_root,
            request: ScaffoldRequest::default(),
            generator: DEFAULT_GENERATOR.to_string(),
            generated: None,
        }
    }

    pub fn with_generator(mut self, generator: &str) -> Self {
        self.generator = generator.to_string();
        self
    }
}

impl CommandController for NewQuickstart {
    fn initialize(&mut self) -> Result<(), CommandFailure> {
        self.request = ScaffoldRequest::default();
        self.generated = None;
        Ok(())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: QUICKSTART_NAME.to_string(),
            description: "Generate a project from a template in one step".to_string(),
            category: "Scaffold".to_string(),
            deprecated: false,
        }
    }

    fn inputs(&self) -> Vec<InputDescriptor> {
        vec![
            self.request.named_input(),
            self.request.description_input(),
            self.request.template_input(),
        ]
    }

    fn set_input(&mut self, name: &str, values: &[String]) {
        self.request.set(name, values);
    }

    fn validate(&mut self) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();
        self.request.validate_named(&mut messages);
        self.request.validate_template(&mut messages);
        messages
    }

    fn execute(&mut self) -> Result<ResultNode, CommandFailure> {
        let (workspace, result) = self
            .request
            .generate(&self.workspace_root, &self.generator)?;
        self.generated = Some(workspace);
        Ok(result)
    }

    fn artifact_path(&self) -> Option<PathBuf> {
        self.generated.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::INPUT_NAMED;
    use tempfile::tempdir;

    #[test]
    fn missing_name_is_the_first_error() {
        let mut command = NewQuickstart::new(PathBuf::from("/unused"));
        command.initialize().expect("init");
        let messages = command.validate();
        assert_eq!(messages[0].description, "Name is required");
        assert!(messages[0].is_error());
    }

    #[test]
    fn execute_records_the_artifact_directory() {
        let dir = tempdir().expect("tempdir");
        let mut command = NewQuickstart::new(dir.path().to_path_buf());
        command.initialize().expect("init");
        assert!(command.artifact_path().is_none());
        command.set_input(INPUT_NAMED, &["demo".to_string()]);
        command.execute().expect("execute");
        let artifact = command.artifact_path().expect("artifact");
        assert!(artifact.join("README.md").is_file());
    }
}
