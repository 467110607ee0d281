use cmdhost::config::{
    bootstrap_state_root, load_settings, save_settings, ConfigError, Settings,
};
use cmdhost::registry::CommandKind;
use std::fs;
use tempfile::tempdir;

#[test]
fn default_settings_round_trip_through_yaml() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested/config.yaml");
    let settings = Settings::with_state_root(dir.path().join("state"));
    save_settings(&settings, &path).expect("save");
    let loaded = load_settings(&path).expect("load");
    assert_eq!(loaded, settings);
}

#[test]
fn minimal_yaml_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        format!(
            "state_root: {}\ncommands:\n  - name: hello\n    label: Hello\n",
            dir.path().display()
        ),
    )
    .expect("write config");

    let settings = load_settings(&path).expect("load");
    assert_eq!(settings.framework_version, "1.0");
    assert_eq!(settings.archive.default_id, "demo");
    assert_eq!(settings.default_command, None);
    assert_eq!(settings.commands[0].kind, CommandKind::Command);

    let registry = settings.build_registry().expect("registry");
    assert!(registry.is_known_command("hello"));
    assert!(!registry.is_known_query("hello"));
}

#[test]
fn undeclared_default_command_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        format!(
            "state_root: {}\ndefault_command: ghost\n",
            dir.path().display()
        ),
    )
    .expect("write config");

    let err = load_settings(&path).expect_err("invalid default command");
    assert!(matches!(err, ConfigError::Settings(ref msg) if msg.contains("`ghost`")));
}

#[test]
fn invalid_yaml_reports_the_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, "state_root: [unterminated").expect("write config");
    let err = load_settings(&path).expect_err("parse failure");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn bootstrap_creates_state_directories() {
    let dir = tempdir().expect("tempdir");
    let settings = Settings::with_state_root(dir.path().join("state"));
    bootstrap_state_root(&settings).expect("bootstrap");
    assert!(settings.workspaces_dir().is_dir());
    assert!(settings.log_path().parent().expect("log dir").is_dir());
}
