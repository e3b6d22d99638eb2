mod common;

use common::{stdout_json, td_command, write_doc};
use predicates::prelude::*;
use serde_json::json;

fn sample() -> serde_json::Value {
    json!({
        "meta": {"tasksResultOutputDir": "/work/results", "owner": "ops"},
        "tasks": [
            {"number": 1, "key": "setup", "title": "Setup", "status": "done"},
            {
                "number": 2, "key": "api", "title": "API", "status": "pending",
                "priority": "high", "precondition": ["setup"],
                "subtasks": [
                    {"number": 2.1, "key": "routes", "title": "Routes"},
                    {"number": 2.2, "title": "Handlers", "precondition": ["routes"]}
                ]
            },
            {"number": 3, "key": "docs", "title": "Docs", "status": "pending"}
        ]
    })
}

#[test]
fn test_cli_next_picks_highest_priority() {
    let doc = write_doc(&sample());

    let output = doc.command().arg("next").assert().success();
    let value = stdout_json(output.get_output());

    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["nextTask"]["key"], "api");
    assert_eq!(value["data"]["nextTask"]["priority"], "high");
    assert_eq!(value["data"]["isSubtask"], false);
}

#[test]
fn test_cli_next_does_not_modify_document() {
    let doc = write_doc(&sample());
    let before = std::fs::read_to_string(&doc.path).unwrap();

    doc.command().arg("next").assert().success();

    assert_eq!(std::fs::read_to_string(&doc.path).unwrap(), before);
}

#[test]
fn test_cli_status_then_next_subtask() {
    let doc = write_doc(&sample());

    doc.command()
        .args(["status", "api", "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalUpdated\": 1"))
        .stdout(predicate::str::contains("api (2) [pending → in-progress]"));

    let output = doc.command().arg("next").assert().success();
    let value = stdout_json(output.get_output());
    assert_eq!(value["data"]["nextTask"]["number"], "2.1");
    assert_eq!(value["data"]["nextTask"]["parentNumber"], "2");
    assert_eq!(value["data"]["isSubtask"], true);
}

#[test]
fn test_cli_status_multiple_identifiers() {
    let doc = write_doc(&sample());

    doc.command()
        .args(["status", "docs, 2.1", "review"])
        .assert()
        .success();

    let saved = doc.read();
    assert_eq!(saved["tasks"][2]["status"], "review");
    assert_eq!(saved["tasks"][1]["subtasks"][0]["status"], "review");
}

#[test]
fn test_cli_status_unknown_identifier_fails() {
    let doc = write_doc(&sample());
    let before = doc.read();

    doc.command()
        .args(["status", "ghost", "done"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("\"status\": \"error\""))
        .stdout(predicate::str::contains(
            "Error setting task status: Task with identifier 'ghost' not found",
        ));

    assert_eq!(doc.read(), before);
}

#[test]
fn test_cli_status_invalid_value_fails() {
    let doc = write_doc(&sample());

    doc.command()
        .args(["status", "docs", "finished"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid status value: finished"));
}

#[test]
fn test_cli_reset() {
    let doc = write_doc(&sample());

    let output = doc.command().arg("reset").assert().success();
    let value = stdout_json(output.get_output());
    assert_eq!(value["data"]["totalItems"], 5);
    assert_eq!(value["data"]["configSaved"], true);

    let saved = doc.read();
    assert_eq!(saved["tasks"][0]["status"], "pending");
    assert_eq!(saved["tasks"][0]["result"], "");
    assert_eq!(saved["meta"]["owner"], "ops");
}

#[test]
fn test_cli_info() {
    let doc = write_doc(&sample());

    let output = doc.command().arg("info").assert().success();
    let value = stdout_json(output.get_output());
    assert_eq!(value["tasksCount"], 3);
    assert_eq!(value["subtasksCount"], 2);
    assert_eq!(value["tasksResultOutputDir"], "/work/results");
}

#[test]
fn test_cli_config_flag_overrides_env() {
    let doc = write_doc(&sample());

    td_command()
        .env("TASK_CONFIG_PATH", "/nonexistent/tasks.json")
        .arg("--config")
        .arg(&doc.path)
        .arg("next")
        .assert()
        .success();
}

#[test]
fn test_cli_missing_config_env() {
    td_command()
        .arg("next")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"code\": \"CONFIG_ERROR\""))
        .stderr(predicate::str::contains("TASK_CONFIG_PATH environment variable is required"));
}

#[test]
fn test_cli_relative_config_rejected() {
    td_command()
        .env("TASK_CONFIG_PATH", "relative/tasks.json")
        .arg("next")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be an absolute path"));
}

#[test]
fn test_cli_missing_document() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.json");

    td_command()
        .env("TASK_CONFIG_PATH", &path)
        .arg("next")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Error getting next task: Task configuration file does not exist",
        ));
}

#[test]
fn test_cli_invalid_json_document() {
    let doc = write_doc(&json!({}));
    std::fs::write(&doc.path, "{ not json").unwrap();

    doc.command()
        .arg("next")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid JSON format in configuration file"));
}

#[test]
fn test_cli_document_without_tasks_array() {
    let doc = write_doc(&json!({"tasks": {"number": 1}}));

    doc.command()
        .arg("reset")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Error initializing tasks: Configuration file must contain a \\\"tasks\\\" array",
        ));
}

#[test]
fn test_cli_logs_stay_off_stdout() {
    let doc = write_doc(&sample());

    let output = doc
        .command()
        .env("TD_LOG_LEVEL", "debug")
        .arg("next")
        .assert()
        .success();

    // stdout must remain a single JSON document
    stdout_json(output.get_output());
}

#[test]
fn test_cli_help() {
    td_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mcp-server"))
        .stdout(predicate::str::contains("status"));
}
