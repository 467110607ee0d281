use crate::archive::ArchiveError;
use crate::command::controller::{CommandFailure, ValidationMessage};

/// HTTP-style status conventions shared by every engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    Ok,
    BadRequest,
    NotFound,
    PreconditionFailed,
    InternalServerError,
}

impl ResponseStatus {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::PreconditionFailed => 412,
            Self::InternalServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Ok
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

fn quoted_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn first_description(messages: &[ValidationMessage]) -> &str {
    messages
        .first()
        .map(|message| message.description.as_str())
        .unwrap_or("no validation messages")
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("No such command `{name}`. Supported commands are {}", quoted_names(.supported))]
    UnknownCommand { name: String, supported: Vec<String> },
    #[error("No commands are supported by this service")]
    NoCommandsSupported,
    #[error("No such query `{name}`. Supported queries are {}", quoted_names(.supported))]
    UnknownQuery { name: String, supported: Vec<String> },
    #[error("No queries are supported by this service")]
    NoQueriesSupported,
    #[error(
        "No such archive command `{name}`. Supported archive commands are {}",
        quoted_names(.supported)
    )]
    UnknownArchiveCommand { name: String, supported: Vec<String> },
    #[error("No archive commands are supported by this service")]
    NoArchiveCommandsSupported,
    #[error("command `{name}` is not a wizard")]
    NotAWizard { name: String },
    #[error("step index `{raw}` is not a non-negative integer")]
    MalformedStepIndex { raw: String },
    #[error("malformed input document: {0}")]
    MalformedDocument(String),
    #[error("command inputs are invalid: {}", first_description(.messages))]
    ValidationFailed { messages: Vec<ValidationMessage> },
    #[error("command execution failed: {0}")]
    ExecutionFailed(#[source] CommandFailure),
    #[error("failed to resolve command `{name}` (label `{label}`): {reason}")]
    CommandResolution {
        name: String,
        label: String,
        reason: String,
    },
    #[error("command `{name}` produced no artifact to archive")]
    MissingArtifact { name: String },
    #[error("failed to package archive from {path}: {source}")]
    Archive {
        path: String,
        #[source]
        source: ArchiveError,
    },
}

impl EngineError {
    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::UnknownCommand { .. }
            | Self::NoCommandsSupported
            | Self::UnknownQuery { .. }
            | Self::NoQueriesSupported
            | Self::UnknownArchiveCommand { .. }
            | Self::NoArchiveCommandsSupported => ResponseStatus::NotFound,
            Self::NotAWizard { .. } | Self::MalformedStepIndex { .. } | Self::MalformedDocument(_) => {
                ResponseStatus::BadRequest
            }
            Self::ValidationFailed { .. } => ResponseStatus::PreconditionFailed,
            Self::ExecutionFailed(_)
            | Self::CommandResolution { .. }
            | Self::MissingArtifact { .. }
            | Self::Archive { .. } => ResponseStatus::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_lists_supported_names_quoted() {
        let err = EngineError::UnknownCommand {
            name: "nope".to_string(),
            supported: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No such command `nope`. Supported commands are 'a', 'b'"
        );
        assert_eq!(err.status().code(), 404);
    }

    #[test]
    fn status_codes_follow_request_conventions() {
        assert_eq!(
            EngineError::NotAWizard {
                name: "x".to_string()
            }
            .status(),
            ResponseStatus::BadRequest
        );
        assert_eq!(
            EngineError::ValidationFailed {
                messages: Vec::new()
            }
            .status()
            .code(),
            412
        );
        assert_eq!(
            EngineError::ExecutionFailed(CommandFailure::new("boom"))
                .status()
                .code(),
            500
        );
    }
}
