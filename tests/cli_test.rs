/// CLI binary integration tests using assert_cmd
///
/// These tests invoke the actual binary and verify command-line behavior
mod common;

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

use common::{ConversationBuilder, sample_export};

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chatgpt-history-search"));
    cmd.env_remove("CHATGPT_EXPORT_PATH").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_no_command_shows_help_message() {
    cli().assert().success().stdout(predicate::str::contains("Use --help for usage information"));
}

#[test]
fn test_cli_help_flag() {
    cli().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Search an exported ChatGPT conversation archive"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_cli_version_flag() {
    cli().arg("--version").assert().success().stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_missing_export_path() {
    cli().arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No export path provided"));
}

#[test]
fn test_cli_export_path_from_environment() {
    let (_dir, path) = sample_export().write_zip();

    cli().env("CHATGPT_EXPORT_PATH", &path)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("ChatGPT History Statistics"))
        .stdout(predicate::str::contains("Total conversations: 3"))
        .stdout(predicate::str::contains("Total messages: 7"))
        .stdout(predicate::str::contains("Indexed terms: "))
        .stdout(predicate::str::contains("Export: "))
        .stdout(predicate::str::contains("chatgpt-export.zip"));
}

#[test]
fn test_cli_stats_keeps_undated_messages_out_of_months() {
    let (_dir, path) = sample_export()
        .with_conversation(ConversationBuilder::new("undated").no_create_time().message("user", "no clock"))
        .write_json();

    let output = cli().arg("--export-path").arg(&path).arg("stats").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains("Messages without a date: 1"));
    assert!(!stdout.contains("- unknown"));
    let months: Vec<&str> = stdout.lines().filter(|line| line.starts_with("- 2024-")).collect();
    assert_eq!(months.first().map(|m| &m[..9]), Some("- 2024-03"));
    assert_eq!(months.len(), 3);
}

#[test]
fn test_cli_search_text_output() {
    let (_dir, path) = sample_export().write_json();

    cli().arg("--export-path")
        .arg(&path)
        .args(["search", "python"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 conversation(s) matching 'python'"))
        .stdout(predicate::str::contains("ID: c1"));
}

#[test]
fn test_cli_search_no_results() {
    let (_dir, path) = sample_export().write_json();

    cli().arg("--export-path")
        .arg(&path)
        .args(["search", "finance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversations found matching 'finance'"));
}

#[test]
fn test_cli_search_offset_past_results() {
    let (_dir, path) = sample_export().write_json();

    cli().arg("--export-path")
        .arg(&path)
        .args(["search", "python", "--offset", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results at offset 5: 'python' matched 1 conversation(s)."))
        .stdout(predicate::str::contains("No conversations found").not());
}

#[test]
fn test_cli_search_json_output() {
    let (_dir, path) = sample_export().write_json();

    let output = cli().arg("--export-path").arg(&path).args(["--json", "search", "marketing"]).output().unwrap();
    assert!(output.status.success());
    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["results"][0]["conversation_id"], "c2");
}

#[test]
fn test_cli_search_invalid_range_fails() {
    let (_dir, path) = sample_export().write_json();

    cli().arg("--export-path")
        .arg(&path)
        .args(["search", "python", "--from", "2024-05-01", "--to", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_cli_get_conversation() {
    let (_dir, path) = sample_export().write_json();

    cli().arg("--export-path")
        .arg(&path)
        .args(["get", "c3", "--max-messages", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trip ideas"))
        .stdout(predicate::str::contains("[You]"))
        .stdout(predicate::str::contains("[ChatGPT]"))
        .stdout(predicate::str::contains("1 more messages not shown"));
}

#[test]
fn test_cli_list_pagination_hint() {
    let (_dir, path) = sample_export().write_json();

    cli().arg("--export-path")
        .arg(&path)
        .args(["list", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversations 1-2 of 3"))
        .stdout(predicate::str::contains("Use --offset 2 to see more."));
}

#[test]
fn test_cli_tools_lists_definitions_without_export() {
    let output = cli().arg("tools").output().unwrap();
    assert!(output.status.success());
    let definitions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> =
        definitions.as_array().unwrap().iter().filter_map(|d| d["name"].as_str()).collect();
    assert_eq!(
        names,
        vec!["chatgpt_search", "chatgpt_get_conversation", "chatgpt_list_conversations", "chatgpt_stats"]
    );
}

#[test]
fn test_cli_call_tool() {
    let (_dir, path) = sample_export().write_json();

    cli().arg("--export-path")
        .arg(&path)
        .args(["call", "chatgpt_list_conversations", r#"{"limit": 1}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 3"));
}

#[test]
fn test_cli_call_error_body() {
    let (_dir, path) = sample_export().write_json();

    cli().arg("--export-path")
        .arg(&path)
        .args(["call", "chatgpt_get_conversation", r#"{"conversation_id": "nope"}"#])
        .assert()
        .failure()
        .stdout(predicate::str::contains("NotFoundError"));
}

#[test]
fn test_cli_logs_go_to_stderr() {
    let (_dir, path) = sample_export().write_json();

    cli().arg("--export-path")
        .arg(&path)
        .args(["--json", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stderr(predicate::str::contains("Indexed 3 conversations"));
}
