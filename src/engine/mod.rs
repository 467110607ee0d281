pub mod response;

use crate::archive::{archive_file_name, pack};
use crate::cleanup::CleanupQueue;
use crate::command::{
    build_from_params, flatten_entities, flatten_message, CommandFactory, CommandFailure,
    CommandSession, InputDocument, RequestContext, ResultNode,
};
use crate::config::{ConfigError, Settings};
use crate::registry::CommandRegistry;
use crate::shared::ids::validate_identifier_value;
use crate::shared::{EngineError, EventLog, ResponseStatus};
use serde_json::{json, Value};
use std::path::PathBuf;

pub use response::{into_response, EngineResponse, ResponseBody};

/// Input whose first value names the produced archive.
pub const ARCHIVE_ID_INPUT: &str = "named";
pub const GENERIC_FAILURE_MESSAGE: &str = "Command execution failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub framework_version: String,
    pub default_archive_id: String,
    pub default_command: Option<String>,
    pub workspace_root: PathBuf,
}

impl EngineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            framework_version: settings.framework_version.clone(),
            default_archive_id: settings.archive.default_id.clone(),
            default_command: settings.default_command.clone(),
            workspace_root: settings.workspaces_dir(),
        }
    }
}

pub struct ExecutionEngine {
    registry: CommandRegistry,
    factory: Box<dyn CommandFactory>,
    cleanup: CleanupQueue,
    log: EventLog,
    options: EngineOptions,
}

impl ExecutionEngine {
    pub fn new(
        registry: CommandRegistry,
        factory: impl CommandFactory + 'static,
        cleanup: CleanupQueue,
        log: EventLog,
        options: EngineOptions,
    ) -> Self {
        Self {
            registry,
            factory: Box::new(factory),
            cleanup,
            log,
            options,
        }
    }

    pub fn from_settings(
        settings: &Settings,
        factory: impl CommandFactory + 'static,
        cleanup: CleanupQueue,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::new(
            settings.build_registry()?,
            factory,
            cleanup,
            EventLog::new(settings.log_path()),
            EngineOptions::from_settings(settings),
        ))
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(self.options.workspace_root.clone())
    }

    fn open_session(
        &self,
        name: &str,
        context: &RequestContext,
    ) -> Result<CommandSession, EngineError> {
        CommandSession::open(self.factory.as_ref(), &self.registry, name, context)
    }

    /// Creates and releases a session for the default command so the
    /// factory's first-use cost is paid at startup. Failures are logged only.
    pub fn warm_up(&self) {
        let Some(name) = self.options.default_command.as_deref() else {
            return;
        };
        self.log.info("engine.warmup.started", name);
        let context = self.request_context();
        let outcome = self
            .registry
            .validate_command(name)
            .and_then(|()| self.open_session(name, &context));
        match outcome {
            Ok(mut session) => {
                session.close();
                self.log.info("engine.warmup.completed", name);
            }
            Err(err) => self.log.error(
                "engine.warmup.failed",
                &format!("error while warming up `{name}`: {err}"),
            ),
        }
    }

    pub fn info(&self) -> EngineResponse {
        EngineResponse::json(
            ResponseStatus::Ok,
            json!({
                "backendVersion": env!("CARGO_PKG_VERSION"),
                "frameworkVersion": self.options.framework_version,
            }),
        )
    }

    pub fn describe(
        &self,
        name: &str,
        context: &RequestContext,
    ) -> Result<EngineResponse, EngineError> {
        self.registry.validate_command(name)?;
        let mut session = self.open_session(name, context)?;
        let body = json!({
            "metadata": session.metadata(),
            "state": session.current_state(),
            "inputs": session.inputs(),
        });
        session.close();
        Ok(EngineResponse::json(ResponseStatus::Ok, body))
    }

    pub fn validate(
        &self,
        name: &str,
        doc: &InputDocument,
        context: &RequestContext,
    ) -> Result<EngineResponse, EngineError> {
        self.registry.validate_command(name)?;
        let mut session = self.open_session(name, context)?;
        session.populate_all_inputs(doc);
        let body = json!({
            "state": session.current_state(),
            "messages": session.validation_messages(),
            "inputs": session.inputs(),
        });
        session.close();
        Ok(EngineResponse::json(ResponseStatus::Ok, body))
    }

    /// Advances a wizard up to `doc.step_index` steps and describes where it
    /// ended up.
    pub fn next_step(
        &self,
        name: &str,
        doc: &InputDocument,
        context: &RequestContext,
    ) -> Result<EngineResponse, EngineError> {
        self.registry.validate_command(name)?;
        let mut session = self.open_session(name, context)?;
        let messages = session.advance_step(doc, doc.step_index)?;
        let body = json!({
            "messages": messages,
            "metadata": session.metadata(),
            "state": session.current_state(),
            "stepIndex": session.current_step(),
            "inputs": session.inputs(),
        });
        session.close();
        Ok(EngineResponse::json(ResponseStatus::Ok, body))
    }

    /// Step request carrying a JSON document; a missing `stepIndex`
    /// advances one step.
    pub fn next_step_json(
        &self,
        name: &str,
        content: &Value,
        context: &RequestContext,
    ) -> Result<EngineResponse, EngineError> {
        self.registry.validate_command(name)?;
        let doc = InputDocument::from_json(content, 1)?;
        self.next_step(name, &doc, context)
    }

    pub fn execute_json(
        &self,
        name: &str,
        content: &Value,
        context: &RequestContext,
    ) -> Result<EngineResponse, EngineError> {
        self.registry.validate_command(name)?;
        let doc = InputDocument::from_json(content, 0)?;
        self.execute(name, &doc, context)
    }

    pub fn execute(
        &self,
        name: &str,
        doc: &InputDocument,
        context: &RequestContext,
    ) -> Result<EngineResponse, EngineError> {
        self.registry.validate_command(name)?;
        let mut session = self.open_session(name, context)?;
        session.populate_all_inputs(doc);
        let response = match session.execute() {
            Ok(result) => render_result(&result),
            Err(err) => self.recover(name, err)?,
        };
        session.close();
        Ok(response)
    }

    pub fn execute_form(
        &self,
        name: &str,
        params: &[(String, Vec<String>)],
        context: &RequestContext,
    ) -> Result<EngineResponse, EngineError> {
        self.registry.validate_command(name)?;
        let doc = build_from_params(params)?;
        self.execute(name, &doc, context)
    }

    /// Execute-by-query-parameters. Any failure description is reduced to a
    /// 412 carrying the first message text.
    pub fn query(
        &self,
        name: &str,
        params: &[(String, Vec<String>)],
        context: &RequestContext,
    ) -> Result<EngineResponse, EngineError> {
        self.registry.validate_query(name)?;
        let doc = build_from_params(params)?;
        let response = self.execute(name, &doc, context)?;
        Ok(precondition_from_failure(response))
    }

    pub fn archive(
        &self,
        name: &str,
        doc: &InputDocument,
        context: &RequestContext,
    ) -> Result<EngineResponse, EngineError> {
        self.registry.validate_archive_command(name)?;
        let mut session = self.open_session(name, context)?;
        session.populate_all_inputs(doc);
        if let Err(err) = session.execute() {
            return self.recover(name, err);
        }
        let path = session
            .artifact_path()
            .ok_or_else(|| EngineError::MissingArtifact {
                name: name.to_string(),
            })?;
        session.close();

        let archive_id = self.archive_id(name, doc);
        let packed = pack(archive_id, &path);
        if !self.cleanup.enqueue(path.clone()) {
            self.log.warn(
                "command.archive.cleanup_unavailable",
                &format!("cleanup worker is gone; {} was not queued", path.display()),
            );
        }
        let bytes = packed.map_err(|source| EngineError::Archive {
            path: path.display().to_string(),
            source,
        })?;

        self.log.info(
            "command.archive.completed",
            &format!("command={name} archive={archive_id} bytes={}", bytes.len()),
        );
        Ok(EngineResponse::archive(archive_file_name(archive_id), bytes))
    }

    /// The archive id becomes both the zip's top-level folder and the
    /// attachment filename, so anything that is not a plain identifier falls
    /// back to the configured default.
    fn archive_id<'a>(&'a self, name: &str, doc: &'a InputDocument) -> &'a str {
        let default_id = self.options.default_archive_id.as_str();
        let Some(requested) = doc
            .first_value(ARCHIVE_ID_INPUT)
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            return default_id;
        };
        match validate_identifier_value("archive id", requested) {
            Ok(()) => requested,
            Err(reason) => {
                self.log.warn(
                    "command.archive.id_rejected",
                    &format!("command={name} {reason}; using `{default_id}`"),
                );
                default_id
            }
        }
    }

    /// Validation and execution failures become response payloads; every
    /// other error keeps propagating.
    fn recover(&self, name: &str, err: EngineError) -> Result<EngineResponse, EngineError> {
        match err {
            EngineError::ValidationFailed { messages } => Ok(EngineResponse::json(
                ResponseStatus::PreconditionFailed,
                json!({ "messages": messages }),
            )),
            EngineError::ExecutionFailed(failure) => {
                self.log.error(
                    "command.execute.failed",
                    &format!("command={name} error={failure}"),
                );
                Ok(EngineResponse::json(
                    ResponseStatus::InternalServerError,
                    describe_failure(&failure),
                ))
            }
            other => Err(other),
        }
    }
}

fn render_result(result: &ResultNode) -> EngineResponse {
    if result.has_entity() {
        EngineResponse::json(ResponseStatus::Ok, flatten_entities(result))
    } else {
        EngineResponse::text(ResponseStatus::Ok, flatten_message(result))
    }
}

fn describe_failure(failure: &CommandFailure) -> Value {
    let cause = std::error::Error::source(failure).map(|source| source.to_string());
    json!({
        "messages": [{ "description": failure.message, "severity": "ERROR" }],
        "failure": { "message": failure.message, "cause": cause },
    })
}

fn first_message(body: &Value) -> Option<&str> {
    body.get("messages")
        .and_then(Value::as_array)
        .and_then(|messages| messages.first())
        .and_then(|message| message.get("description"))
        .and_then(Value::as_str)
}

fn precondition_from_failure(response: EngineResponse) -> EngineResponse {
    if response.status.is_success() {
        return response;
    }
    match &response.body {
        ResponseBody::Json(body) => EngineResponse::text(
            ResponseStatus::PreconditionFailed,
            first_message(body).unwrap_or(GENERIC_FAILURE_MESSAGE),
        ),
        _ => response,
    }
}
