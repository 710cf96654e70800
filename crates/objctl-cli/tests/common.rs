//! Common test utilities shared across integration tests.
//!
//! Clippy cannot track usage across integration test files, hence the
//! `allow(dead_code)` annotation.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestFixture {
    _temp_dir: TempDir,
    config_dir: PathBuf,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// An empty config folder: the first invocation seeds it.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_dir = temp_dir.path().join(".objctl");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        Self {
            _temp_dir: temp_dir,
            config_dir,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn session_dir(&self) -> PathBuf {
        self.config_dir.join("session")
    }

    pub fn write_config(&self, name: &str, content: &str) -> anyhow::Result<()> {
        fs::write(self.config_dir.join(name), content)?;
        Ok(())
    }

    pub fn write_session(&self, id: &str, content: &str) -> anyhow::Result<()> {
        fs::create_dir_all(self.session_dir())?;
        fs::write(self.session_dir().join(format!("{}.json", id)), content)?;
        Ok(())
    }

    /// The binary with its config folder pinned to this fixture.
    pub fn command(&self) -> Command {
        let mut cmd = self.bare_command();
        cmd.arg("--config-folder").arg(self.config_dir());
        cmd
    }

    /// The binary with a clean environment but no config folder flag.
    pub fn bare_command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("objctl");
        cmd.env_remove("OBJCTL_LOG")
            .env_remove("OBJCTL_CONFIG_DIR")
            .env("USER", "tester");
        cmd
    }

    /// Run `objctl <args> --json` and parse each stdout line.
    pub fn run_json(&self, args: &[&str]) -> anyhow::Result<Vec<serde_json::Value>> {
        let output = self.command().args(args).arg("--json").output()?;
        if !output.status.success() {
            anyhow::bail!(
                "objctl {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8(output.stdout)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(anyhow::Error::from))
            .collect()
    }
}
