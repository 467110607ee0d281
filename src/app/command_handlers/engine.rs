use crate::app::cli::CliInvocation;
use crate::builtin::{BuiltinCommandFactory, CLIENT_ATTRIBUTE};
use crate::cleanup::CleanupWorker;
use crate::command::{build_input_document, RequestContext};
use crate::config::{bootstrap_state_root, load_global_settings, load_settings, Settings};
use crate::engine::{into_response, EngineResponse, ExecutionEngine, ResponseBody};
use crate::shared::{EngineError, EventLog};
use std::fs;
use std::path::PathBuf;

/// Default wizard advance for `next` when `--step` is absent.
const DEFAULT_NEXT_STEPS: &str = "1";
const CLI_CLIENT: &str = "cmdhost-cli";

fn load_cli_settings(invocation: &CliInvocation) -> Result<Settings, String> {
    let settings = match &invocation.config {
        Some(path) => load_settings(path),
        None => load_global_settings(),
    }
    .map_err(|err| err.to_string())?;
    bootstrap_state_root(&settings).map_err(|err| err.to_string())?;
    Ok(settings)
}

/// Builds an engine plus its cleanup worker for one CLI call. The engine is
/// dropped before the worker is joined so every queued path is deleted
/// before the process exits.
fn with_engine<F>(invocation: &CliInvocation, run: F) -> Result<String, String>
where
    F: FnOnce(&ExecutionEngine, &RequestContext) -> Result<String, String>,
{
    let settings = load_cli_settings(invocation)?;
    let (queue, worker) = CleanupWorker::spawn(EventLog::new(settings.log_path()));
    let outcome = match ExecutionEngine::from_settings(&settings, BuiltinCommandFactory, queue) {
        Ok(engine) => {
            engine.warm_up();
            let context = engine
                .request_context()
                .with_attribute(CLIENT_ATTRIBUTE, vec![CLI_CLIENT.to_string()]);
            run(&engine, &context)
        }
        Err(err) => Err(err.to_string()),
    };
    worker.join();
    outcome
}

fn render_body(body: &ResponseBody) -> String {
    match body {
        ResponseBody::Json(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        ResponseBody::Text(text) => text.clone(),
        ResponseBody::Archive {
            filename, bytes, ..
        } => format!("<{} bytes for {filename}>", bytes.len()),
    }
}

/// `<status> <body>`; non-2xx responses become errors so the binary exits 1.
pub fn render_response(response: &EngineResponse) -> Result<String, String> {
    let rendered = format!("{} {}", response.status, render_body(&response.body));
    if response.status.is_success() {
        Ok(rendered)
    } else {
        Err(rendered)
    }
}

fn respond(result: Result<EngineResponse, EngineError>) -> Result<String, String> {
    render_response(&into_response(result))
}

pub fn cmd_version(invocation: &CliInvocation) -> Result<String, String> {
    with_engine(invocation, |engine, _| render_response(&engine.info()))
}

pub fn cmd_commands(invocation: &CliInvocation) -> Result<String, String> {
    with_engine(invocation, |engine, _| {
        let descriptors = engine.registry().descriptors();
        if descriptors.is_empty() {
            return Ok("no commands registered".to_string());
        }
        Ok(descriptors
            .iter()
            .map(|descriptor| {
                format!(
                    "{:24} {:8} {}",
                    descriptor.name,
                    descriptor.kind.as_str(),
                    descriptor.label
                )
            })
            .collect::<Vec<_>>()
            .join("\n"))
    })
}

pub fn cmd_describe(invocation: &CliInvocation) -> Result<String, String> {
    let name = invocation.command_name("describe")?;
    with_engine(invocation, |engine, context| {
        respond(engine.describe(name, context))
    })
}

pub fn cmd_validate(invocation: &CliInvocation) -> Result<String, String> {
    let name = invocation.command_name("validate")?;
    with_engine(invocation, |engine, context| {
        respond(
            build_input_document(invocation.step.as_deref(), &invocation.inputs)
                .and_then(|doc| engine.validate(name, &doc, context)),
        )
    })
}

pub fn cmd_next(invocation: &CliInvocation) -> Result<String, String> {
    let name = invocation.command_name("next")?;
    let step = invocation.step.as_deref().unwrap_or(DEFAULT_NEXT_STEPS);
    with_engine(invocation, |engine, context| {
        respond(
            build_input_document(Some(step), &invocation.inputs)
                .and_then(|doc| engine.next_step(name, &doc, context)),
        )
    })
}

pub fn cmd_query(invocation: &CliInvocation) -> Result<String, String> {
    let name = invocation.command_name("query")?;
    with_engine(invocation, |engine, context| {
        respond(engine.query(name, &invocation.inputs, context))
    })
}

pub fn cmd_execute(invocation: &CliInvocation) -> Result<String, String> {
    let name = invocation.command_name("execute")?;
    with_engine(invocation, |engine, context| {
        respond(
            build_input_document(invocation.step.as_deref(), &invocation.inputs)
                .and_then(|doc| engine.execute(name, &doc, context)),
        )
    })
}

pub fn cmd_archive(invocation: &CliInvocation) -> Result<String, String> {
    let name = invocation.command_name("archive")?;
    with_engine(invocation, |engine, context| {
        let response = into_response(
            build_input_document(invocation.step.as_deref(), &invocation.inputs)
                .and_then(|doc| engine.archive(name, &doc, context)),
        );
        let ResponseBody::Archive {
            filename, bytes, ..
        } = &response.body
        else {
            return render_response(&response);
        };
        let target = invocation
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(filename));
        fs::write(&target, bytes)
            .map_err(|err| format!("failed to write archive {}: {err}", target.display()))?;
        Ok(format!(
            "{} wrote {} ({} bytes)",
            response.status,
            target.display(),
            bytes.len()
        ))
    })
}
