pub mod controller;
pub mod input;
pub mod result;
pub mod session;

pub use controller::{
    CommandController, CommandFactory, CommandFailure, CommandMetadata, CurrentState,
    InputDescriptor, RequestContext, Severity, ValidationMessage, WizardSteps,
};
pub use input::{
    build_from_params, build_input_document, parse_form_encoded, parse_step_index, InputDocument,
    InputValue, STEP_INDEX_PARAM,
};
pub use result::{flatten_entities, flatten_message, ResultNode};
pub use session::{CommandSession, SessionState};
