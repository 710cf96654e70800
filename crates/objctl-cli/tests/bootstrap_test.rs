mod common;

use common::TestFixture;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_first_run_seeds_default_config() {
    let fixture = TestFixture::new();
    assert!(!fixture.config_file().exists());

    fixture.command().arg("version").assert().success();

    let content = fs::read_to_string(fixture.config_file()).unwrap();
    assert!(content.contains("version = 3"));
    assert!(content.contains("[aliases]"));
}

#[test]
fn test_config_folder_from_environment() {
    let fixture = TestFixture::new();

    fixture
        .bare_command()
        .env("OBJCTL_CONFIG_DIR", fixture.config_dir())
        .arg("version")
        .assert()
        .success();

    assert!(fixture.config_file().exists());
}

#[test]
fn test_malformed_config_is_fatal() {
    let fixture = TestFixture::new();
    fixture
        .write_config("config.toml", "version = 3\n[aliases\n")
        .unwrap();

    fixture
        .command()
        .arg("version")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "objctl: <ERROR> Unable to access configuration file.",
        ));
}

#[test]
fn test_unknown_config_version_is_fatal() {
    let fixture = TestFixture::new();
    fixture
        .write_config("config.toml", "version = 7\n")
        .unwrap();

    fixture
        .command()
        .args(["config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to access configuration file."));
}

#[test]
fn test_fatal_error_in_json_mode() {
    let fixture = TestFixture::new();
    fixture
        .write_config("config.toml", "version = 3\n[aliases]\n\"1bad\" = \"https://example.com\"\n")
        .unwrap();

    let output = fixture
        .command()
        .args(["--json", "version"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8(output.stderr).unwrap();
    let line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("no JSON error document on stderr");
    let value: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["message"], "Unable to access configuration file.");
}

#[test]
fn test_help_skips_bootstrap_past_init() {
    let fixture = TestFixture::new();
    fixture
        .write_config("config.toml", "this is not toml")
        .unwrap();

    fixture
        .command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMANDS:"));

    fixture
        .command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("objctl version "));

    // Nothing was migrated or seeded.
    assert_eq!(
        fs::read_to_string(fixture.config_file()).unwrap(),
        "this is not toml"
    );
}

#[test]
fn test_no_command_runs_full_bootstrap() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMANDS:"));

    assert!(fixture.config_file().exists());
}

#[test]
fn test_legacy_config_is_migrated() {
    let fixture = TestFixture::new();
    fixture
        .write_config(
            "config.json",
            r#"{"version":"1","access_key_id":"AKIAEXAMPLE","secret_access_key":"wJalrXUtnFEMI","endpoint":"https://play.example.com"}"#,
        )
        .unwrap();

    fixture.command().arg("version").assert().success();

    assert!(!fixture.config_dir().join("config.json").exists());
    assert!(fixture.config_dir().join("config.json.v1.bak").exists());

    let content = fs::read_to_string(fixture.config_file()).unwrap();
    assert!(content.contains("version = 3"));
    assert!(content.contains("play.example.com"));
    assert!(content.contains("AKIAEXAMPLE"));
}

#[test]
fn test_migration_is_idempotent() {
    let fixture = TestFixture::new();
    fixture
        .write_config(
            "config.json",
            r#"{"version":"1","access_key_id":"AKIAEXAMPLE","secret_access_key":"wJalrXUtnFEMI","endpoint":"https://play.example.com"}"#,
        )
        .unwrap();

    fixture.command().arg("version").assert().success();
    let first = fs::read_to_string(fixture.config_file()).unwrap();

    fixture.command().arg("version").assert().success();
    let second = fs::read_to_string(fixture.config_file()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_legacy_session_is_migrated() {
    let fixture = TestFixture::new();
    fixture
        .write_session(
            "aBcDeF12",
            r#"{"version":"1","command_type":"mirror","urls":["src/","s3/bucket"],"started":"2015-06-01T12:00:00Z","files_copied":4}"#,
        )
        .unwrap();

    fixture
        .command()
        .args(["session", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aBcDeF12"))
        .stdout(predicate::str::contains("mirror src/ s3/bucket"));

    let content = fs::read_to_string(fixture.session_dir().join("aBcDeF12.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["version"], "2");
}

#[test]
fn test_debug_mode_emits_bootstrap_logs() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["--debug", "version"])
        .assert()
        .success()
        .stderr(predicate::str::contains("bootstrap"));
}
