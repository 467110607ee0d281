use crate::app::cli::{help_text, parse_cli_verb, parse_invocation, CliVerb};

pub mod engine;
pub mod setup;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    let verb = parse_cli_verb(args[0].as_str());
    if verb == CliVerb::Unknown {
        return Err(format!("unknown command `{}`", args[0]));
    }
    let invocation = parse_invocation(&args[1..])?;

    match verb {
        CliVerb::Setup => setup::cmd_setup(&invocation),
        CliVerb::Version => engine::cmd_version(&invocation),
        CliVerb::Commands => engine::cmd_commands(&invocation),
        CliVerb::Describe => engine::cmd_describe(&invocation),
        CliVerb::Validate => engine::cmd_validate(&invocation),
        CliVerb::Next => engine::cmd_next(&invocation),
        CliVerb::Query => engine::cmd_query(&invocation),
        CliVerb::Execute => engine::cmd_execute(&invocation),
        CliVerb::Archive => engine::cmd_archive(&invocation),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
