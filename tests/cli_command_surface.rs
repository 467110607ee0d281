use cmdhost::app::cli::{parse_cli_verb, CliVerb};
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::tempdir;

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cmdhost"))
        .args(args)
        .env("HOME", home)
        .current_dir(home)
        .output()
        .expect("run cmdhost")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

fn assert_err_contains(output: &Output, needle: &str) {
    assert!(
        !output.status.success(),
        "expected failure, stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
    let text = format!("{}{}", stdout(output), stderr(output));
    assert!(
        text.contains(needle),
        "expected error to contain `{needle}`, got:\n{text}"
    );
}

fn setup(home: &Path) -> PathBuf {
    let config = home.join("state/config.yaml");
    let config_arg = config.display().to_string();
    let output = run(home, &["setup", "--config", &config_arg]);
    assert_ok(&output);
    assert!(stdout(&output).contains("setup complete"));
    config
}

#[test]
fn verbs_parse_and_unknown_verbs_fail() {
    assert_eq!(parse_cli_verb("archive"), CliVerb::Archive);
    assert_eq!(parse_cli_verb("next"), CliVerb::Next);
    assert_eq!(parse_cli_verb("bogus"), CliVerb::Unknown);

    let dir = tempdir().expect("tempdir");
    assert_err_contains(&run(dir.path(), &["bogus"]), "unknown command `bogus`");
}

#[test]
fn no_arguments_prints_help() {
    let dir = tempdir().expect("tempdir");
    let output = run(dir.path(), &[]);
    assert_ok(&output);
    assert!(stdout(&output).contains("archive <name> [--out PATH] [k=v..]"));
}

#[test]
fn setup_writes_config_and_state_directories() {
    let dir = tempdir().expect("tempdir");
    let config = setup(dir.path());
    assert!(config.is_file());
    assert!(dir.path().join("state/workspaces").is_dir());
    assert!(dir.path().join("state/logs").is_dir());
}

#[test]
fn version_and_commands_use_the_configured_registry() {
    let dir = tempdir().expect("tempdir");
    let config = setup(dir.path());
    let config_arg = config.display().to_string();

    let version = run(dir.path(), &["version", "--config", &config_arg]);
    assert_ok(&version);
    assert!(stdout(&version).starts_with("200 "));
    assert!(stdout(&version).contains("\"frameworkVersion\": \"1.0\""));

    let commands = run(dir.path(), &["commands", "--config", &config_arg]);
    assert_ok(&commands);
    let listed = stdout(&commands);
    assert!(listed.contains("new-quickstart"));
    assert!(listed.contains("list-templates"));
}

#[test]
fn invalid_execute_exits_non_zero_with_precondition_status() {
    let dir = tempdir().expect("tempdir");
    let config = setup(dir.path());
    let config_arg = config.display().to_string();
    let output = run(dir.path(), &["execute", "new-quickstart", "--config", &config_arg]);
    assert_err_contains(&output, "412");
    assert_err_contains(&output, "Name is required");
}

#[test]
fn unknown_command_reports_not_found() {
    let dir = tempdir().expect("tempdir");
    let config = setup(dir.path());
    let config_arg = config.display().to_string();
    let output = run(dir.path(), &["describe", "ghost", "--config", &config_arg]);
    assert_err_contains(&output, "404");
    assert_err_contains(&output, "No such command `ghost`");
}

#[test]
fn archive_writes_zip_and_cleans_workspace() {
    let dir = tempdir().expect("tempdir");
    let config = setup(dir.path());
    let config_arg = config.display().to_string();
    let out = dir.path().join("out.zip");
    let out_arg = out.display().to_string();

    let output = run(
        dir.path(),
        &[
            "archive",
            "new-quickstart",
            "named=cli-app",
            "--out",
            &out_arg,
            "--config",
            &config_arg,
        ],
    );
    assert_ok(&output);
    assert!(stdout(&output).starts_with("200 wrote"));
    let bytes = fs::read(&out).expect("archive written");
    assert!(bytes.starts_with(b"PK"));
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
    let mut manifest = String::new();
    archive
        .by_name("cli-app/Cargo.toml")
        .expect("manifest entry")
        .read_to_string(&mut manifest)
        .expect("read manifest");
    assert!(manifest.starts_with("# generated by cmdhost-cli\n"));

    let leftover = fs::read_dir(dir.path().join("state/workspaces"))
        .expect("workspaces")
        .count();
    assert_eq!(leftover, 0);
}

#[test]
fn query_and_next_step_round_trip() {
    let dir = tempdir().expect("tempdir");
    let config = setup(dir.path());
    let config_arg = config.display().to_string();

    let query = run(
        dir.path(),
        &["query", "list-templates", "prefix=ser", "--config", &config_arg],
    );
    assert_ok(&query);
    assert!(stdout(&query).contains("\"service\""));

    let next = run(
        dir.path(),
        &["next", "new-project", "named=demo", "--config", &config_arg],
    );
    assert_ok(&next);
    assert!(stdout(&next).contains("\"stepIndex\": 1"));

    let not_wizard = run(
        dir.path(),
        &["next", "new-quickstart", "named=demo", "--config", &config_arg],
    );
    assert_err_contains(&not_wizard, "400");
}
