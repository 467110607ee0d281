use super::{ScaffoldRequest, DEFAULT_GENERATOR, PROJECT_NAME};
use crate::command::{
    CommandController, CommandFailure, CommandMetadata, InputDescriptor, ResultNode,
    ValidationMessage, WizardSteps,
};
use std::path::PathBuf;

const STEP_COUNT: usize = 2;

/// Two-page scaffold wizard. Page 0 names the project, page 1 picks the
/// template and version.
#[derive(Debug)]
pub struct NewProject {
    workspace_root: PathBuf,
    request: ScaffoldRequest,
    generator: String,
    step: usize,
    generated: Option<PathBuf>,
}

impl NewProject {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self {
            workspace_root,
            request: ScaffoldRequest::default(),
            generator: DEFAULT_GENERATOR.to_string(),
            step: 0,
            generated: None,
        }
    }

    /// Names the client stamped into the generated manifest.
    pub fn with_generator(mut self, generator: &str) -> Self {
        self.generator = generator.to_string();
        self
    }

    fn step_messages(&self) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();
        match self.step {
            0 => self.request.validate_named(&mut messages),
            _ => self.request.validate_template(&mut messages),
        }
        messages
    }
}

impl WizardSteps for NewProject {
    fn can_move_to_next_step(&mut self) -> bool {
        self.step + 1 < STEP_COUNT
            && !self
                .step_messages()
                .iter()
                .any(ValidationMessage::is_error)
    }

    fn can_move_to_previous_step(&self) -> bool {
        self.step > 0
    }

    fn next_step(&mut self) -> Result<(), CommandFailure> {
        if self.step + 1 >= STEP_COUNT {
            return Err(CommandFailure::new("already on the last step"));
        }
        self.step += 1;
        Ok(())
    }
}

impl CommandController for NewProject {
    fn initialize(&mut self) -> Result<(), CommandFailure> {
        self.request = ScaffoldRequest::default();
        self.step = 0;
        self.generated = None;
        Ok(())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: PROJECT_NAME.to_string(),
            description: "Generate a project from a template, one page at a time".to_string(),
            category: "Scaffold".to_string(),
            deprecated: false,
        }
    }

    fn inputs(&self) -> Vec<InputDescriptor> {
        match self.step {
            0 => vec![
                self.request.named_input(),
                self.request.description_input(),
            ],
            _ => vec![
                self.request.template_input(),
                self.request.version_input(),
            ],
        }
    }

    fn set_input(&mut self, name: &str, values: &[String]) {
        self.request.set(name, values);
    }

    /// Validates every page reached so far.
    fn validate(&mut self) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();
        self.request.validate_named(&mut messages);
        if self.step > 0 {
            self.request.validate_template(&mut messages);
        }
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

    fn wizard(&mut self) -> Option<&mut dyn WizardSteps> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{INPUT_NAMED, INPUT_TEMPLATE};

    #[test]
    fn cannot_leave_the_first_page_without_a_name() {
        let mut wizard = NewProject::new(PathBuf::from("/unused"));
        assert!(!wizard.can_move_to_next_step());
        wizard.set_input(INPUT_NAMED, &["demo".to_string()]);
        assert!(wizard.can_move_to_next_step());
    }

    #[test]
    fn last_page_exposes_template_inputs() {
        let mut wizard = NewProject::new(PathBuf::from("/unused"));
        wizard.set_input(INPUT_NAMED, &["demo".to_string()]);
        wizard.next_step().expect("step");
        assert!(!wizard.can_move_to_next_step());
        assert!(wizard.can_move_to_previous_step());
        let names: Vec<_> = wizard.inputs().into_iter().map(|input| input.name).collect();
        assert_eq!(names, vec![INPUT_TEMPLATE, "version"]);
        assert!(wizard.next_step().is_err());
    }
}
