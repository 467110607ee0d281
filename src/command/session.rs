use super::controller::{
    CommandController, CommandFactory, CommandMetadata, CurrentState, InputDescriptor,
    RequestContext, ValidationMessage,
};
use super::input::InputDocument;
use super::result::ResultNode;
use crate::registry::CommandRegistry;
use crate::shared::EngineError;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Initialized,
    Validating,
    Stepping,
    Executing,
    Closed,
}

/// One command controller scoped to one request. The controller is closed
/// exactly once, by `close()` or on drop.
pub struct CommandSession {
    name: String,
    controller: Box<dyn CommandController>,
    state: SessionState,
    current_step: usize,
}

impl std::fmt::Debug for CommandSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSession")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("current_step", &self.current_step)
            .finish()
    }
}

impl CommandSession {
    pub fn open(
        factory: &dyn CommandFactory,
        registry: &CommandRegistry,
        name: &str,
        context: &RequestContext,
    ) -> Result<Self, EngineError> {
        let label = registry
            .label_of(name)
            .ok_or_else(|| EngineError::CommandResolution {
                name: name.to_string(),
                label: String::new(),
                reason: "command has no registered label".to_string(),
            })?;
        let resolution_error = |reason: String| EngineError::CommandResolution {
            name: name.to_string(),
            label: label.to_string(),
            reason,
        };

        let controller = factory
            .create(label, context)
            .map_err(|err| resolution_error(err.to_string()))?;
        let mut session = Self {
            name: name.to_string(),
            controller,
            state: SessionState::Initialized,
            current_step: 0,
        };
        session
            .controller
            .initialize()
            .map_err(|err| resolution_error(err.to_string()))?;
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn metadata(&self) -> CommandMetadata {
        self.controller.metadata()
    }

    pub fn inputs(&self) -> Vec<InputDescriptor> {
        self.controller.inputs()
    }

    fn populate_current_step(&mut self, doc: &InputDocument) {
        for input in &doc.inputs {
            self.controller.set_input(&input.name, &input.values);
        }
    }

    /// Applies the whole document. Wizards are walked forward up to
    /// `doc.step_index` steps, re-applying the inputs on every new step.
    pub fn populate_all_inputs(&mut self, doc: &InputDocument) {
        self.state = SessionState::Validating;
        self.populate_current_step(doc);
        for _ in 0..doc.step_index {
            let Some(wizard) = self.controller.wizard() else {
                break;
            };
            if !wizard.can_move_to_next_step() {
                break;
            }
            if wizard.next_step().is_err() {
                break;
            }
            self.current_step += 1;
            self.populate_current_step(doc);
        }
    }

    pub fn validation_messages(&mut self) -> Vec<ValidationMessage> {
        self.controller.validate()
    }

    pub fn is_valid(&mut self) -> bool {
        !self
            .controller
            .validate()
            .iter()
            .any(ValidationMessage::is_error)
    }

    pub fn current_state(&mut self) -> CurrentState {
        let valid = self.is_valid();
        let (wizard, can_move_to_next_step, can_move_to_previous_step) =
            match self.controller.wizard() {
                Some(steps) => (
                    true,
                    steps.can_move_to_next_step(),
                    steps.can_move_to_previous_step(),
                ),
                None => (false, false, false),
            };
        CurrentState {
            valid,
            can_execute: valid && !can_move_to_next_step,
            wizard,
            can_move_to_next_step,
            can_move_to_previous_step,
        }
    }

    /// Advances at most `target_step` steps, stopping early without error
    /// when the wizard cannot move on. Returns the validation messages
    /// captured before the last move.
    pub fn advance_step(
        &mut self,
        doc: &InputDocument,
        target_step: usize,
    ) -> Result<Vec<ValidationMessage>, EngineError> {
        if self.controller.wizard().is_none() {
            return Err(EngineError::NotAWizard {
                name: self.name.clone(),
            });
        }
        self.state = SessionState::Stepping;

        let mut captured = Vec::new();
        for _ in 0..target_step {
            let can_move = self
                .controller
                .wizard()
                .is_some_and(|steps| steps.can_move_to_next_step());
            if !can_move {
                break;
            }
            self.populate_current_step(doc);
            captured = self.controller.validate();
            let Some(steps) = self.controller.wizard() else {
                break;
            };
            steps.next_step().map_err(EngineError::ExecutionFailed)?;
            self.current_step += 1;
        }
        Ok(captured)
    }

    pub fn execute(&mut self) -> Result<ResultNode, EngineError> {
        let messages = self.controller.validate();
        if messages.iter().any(ValidationMessage::is_error) {
            return Err(EngineError::ValidationFailed { messages });
        }
        self.state = SessionState::Executing;
        self.controller
            .execute()
            .map_err(EngineError::ExecutionFailed)
    }

    pub fn artifact_path(&self) -> Option<PathBuf> {
        self.controller.artifact_path()
    }

    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;
        self.controller.close();
    }
}

impl Drop for CommandSession {
    fn drop(&mut self) {
        self.close();
    }
}
