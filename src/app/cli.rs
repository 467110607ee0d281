use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Setup,
    Version,
    Commands,
    Describe,
    Validate,
    Next,
    Query,
    Execute,
    Archive,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "setup" => CliVerb::Setup,
        "version" => CliVerb::Version,
        "commands" => CliVerb::Commands,
        "describe" => CliVerb::Describe,
        "validate" => CliVerb::Validate,
        "next" => CliVerb::Next,
        "query" => CliVerb::Query,
        "execute" => CliVerb::Execute,
        "archive" => CliVerb::Archive,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  setup                                Write default config and create state directories"
            .to_string(),
        "  version                              Show backend and framework versions".to_string(),
        "  commands                             List registered commands".to_string(),
        "  describe <name>                      Show metadata, state and inputs of a command"
            .to_string(),
        "  validate <name> [k=v..]              Validate inputs without executing".to_string(),
        "  next <name> [--step N] [k=v..]       Advance a wizard up to N steps (default 1)"
            .to_string(),
        "  query <name> [k=v..]                 Run a query command".to_string(),
        "  execute <name> [--step N] [k=v..]    Execute a command".to_string(),
        "  archive <name> [--out PATH] [k=v..]  Execute and write the result as a zip archive"
            .to_string(),
        String::new(),
        "Options:".to_string(),
        "  --config PATH                        Settings file (default ~/.cmdhost/config.yaml)"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}

/// Flags and `k=v` inputs following a verb.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliInvocation {
    pub config: Option<PathBuf>,
    pub step: Option<String>,
    pub out: Option<PathBuf>,
    pub positional: Vec<String>,
    pub inputs: Vec<(String, Vec<String>)>,
}

impl CliInvocation {
    pub fn command_name(&self, verb: &str) -> Result<&str, String> {
        self.positional
            .first()
            .map(String::as_str)
            .ok_or_else(|| format!("usage: {verb} <name>"))
    }
}

fn flag_value<'a>(
    flag: &str,
    iter: &mut impl Iterator<Item = &'a String>,
) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

/// Splits everything after the verb. Repeated `k=v` keys accumulate values
/// in first-seen order.
pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, String> {
    let mut invocation = CliInvocation::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => invocation.config = Some(PathBuf::from(flag_value(arg, &mut iter)?)),
            "--step" => invocation.step = Some(flag_value(arg, &mut iter)?),
            "--out" => invocation.out = Some(PathBuf::from(flag_value(arg, &mut iter)?)),
            flag if flag.starts_with("--") => return Err(format!("unknown option `{flag}`")),
            _ => match arg.split_once('=') {
                Some((name, value)) if !name.is_empty() => {
                    let value = value.to_string();
                    match invocation
                        .inputs
                        .iter_mut()
                        .find(|(existing, _)| existing == name)
                    {
                        Some((_, values)) => values.push(value),
                        None => invocation.inputs.push((name.to_string(), vec![value])),
                    }
                }
                _ => invocation.positional.push(arg.clone()),
            },
        }
    }
    Ok(invocation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn invocation_collects_flags_and_repeated_inputs() {
        let invocation = parse_invocation(&args(&[
            "new-project",
            "--step",
            "2",
            "tag=a",
            "named=demo",
            "tag=b",
            "--config",
            "/tmp/c.yaml",
        ]))
        .expect("parse");
        assert_eq!(invocation.positional, vec!["new-project"]);
        assert_eq!(invocation.step.as_deref(), Some("2"));
        assert_eq!(invocation.config, Some(PathBuf::from("/tmp/c.yaml")));
        assert_eq!(
            invocation.inputs,
            vec![
                ("tag".to_string(), vec!["a".to_string(), "b".to_string()]),
                ("named".to_string(), vec!["demo".to_string()]),
            ]
        );
    }

    #[test]
    fn flags_without_values_are_rejected() {
        assert_eq!(
            parse_invocation(&args(&["x", "--out"])),
            Err("--out requires a value".to_string())
        );
        assert_eq!(
            parse_invocation(&args(&["--verbose"])),
            Err("unknown option `--verbose`".to_string())
        );
    }
}
