use crate::archive::ARCHIVE_CONTENT_TYPE;
use crate::shared::{EngineError, ResponseStatus};
use serde_json::Value;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Archive {
        filename: String,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineResponse {
    pub status: ResponseStatus,
    pub body: ResponseBody,
}

impl EngineResponse {
    pub fn json(status: ResponseStatus, body: Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(body),
        }
    }

    pub fn text(status: ResponseStatus, body: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Text(body.into()),
        }
    }

    pub fn archive(filename: String, bytes: Vec<u8>) -> Self {
        Self {
            status: ResponseStatus::Ok,
            body: ResponseBody::Archive {
                filename,
                content_type: ARCHIVE_CONTENT_TYPE,
                bytes,
            },
        }
    }

    pub fn content_type(&self) -> &'static str {
        match &self.body {
            ResponseBody::Json(_) => JSON_CONTENT_TYPE,
            ResponseBody::Text(_) => TEXT_CONTENT_TYPE,
            ResponseBody::Archive { content_type, .. } => *content_type,
        }
    }

    /// `attachment; filename="<name>"` for archive bodies.
    pub fn content_disposition(&self) -> Option<String> {
        match &self.body {
            ResponseBody::Archive { filename, .. } => {
                Some(format!("attachment; filename=\"{filename}\""))
            }
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<EngineError> for EngineResponse {
    fn from(err: EngineError) -> Self {
        Self::json(
            err.status(),
            serde_json::json!({ "message": err.to_string() }),
        )
    }
}

impl EngineError {
    pub fn into_response(self) -> EngineResponse {
        EngineResponse::from(self)
    }
}

/// Collapses an operation outcome into the response a transport would send.
pub fn into_response(result: Result<EngineResponse, EngineError>) -> EngineResponse {
    result.unwrap_or_else(EngineError::into_response)
}
