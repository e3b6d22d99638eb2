//! Common utilities for integration tests

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the path to the `td` binary
///
/// Prefers `CARGO_BIN_EXE_td` (set by cargo for integration tests, including
/// runs with a custom `--target-dir`) and falls back to `cargo_bin`.
#[allow(deprecated)]
pub fn td_binary() -> PathBuf {
    std::env::var("CARGO_BIN_EXE_td")
        .map(PathBuf::from)
        .unwrap_or_else(|_| assert_cmd::cargo::cargo_bin("td"))
}

/// A `td` command with the logging and config variables cleared
#[allow(dead_code)]
pub fn td_command() -> Command {
    let mut cmd = Command::new(td_binary());
    cmd.env_remove("TASK_CONFIG_PATH")
        .env_remove("TD_LOG_LEVEL")
        .env_remove("TD_LOG_JSON")
        .env_remove("TD_LOG_VERBOSE")
        .env_remove("TD_LOG_QUIET")
        .env_remove("TD_LOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// A task document written to a temporary directory
pub struct TestDoc {
    pub path: PathBuf,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestDoc {
    pub fn read(&self) -> Value {
        serde_json::from_str(&fs::read_to_string(&self.path).unwrap()).unwrap()
    }

    /// `td` with `TASK_CONFIG_PATH` pointing at this document
    pub fn command(&self) -> Command {
        let mut cmd = td_command();
        cmd.env("TASK_CONFIG_PATH", &self.path);
        cmd
    }
}

/// Write `value` as `tasks.json` in a fresh temporary directory
#[allow(dead_code)]
pub fn write_doc(value: &Value) -> TestDoc {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.json");
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();

    TestDoc {
        path,
        _temp_dir: temp_dir,
    }
}

/// Parse a command's stdout as one JSON value
#[allow(dead_code)]
pub fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_td_binary_exists() {
        let binary = td_binary();
        assert!(binary.exists(), "td binary should exist at {:?}", binary);
    }
}
