//! End-to-end CLI tests for tgchat.
//!
//! These tests run the actual binary against export files written to a
//! temporary directory and check what it prints.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    let chat = r#"{
  "name": "Bob",
  "type": "personal_chat",
  "id": 42,
  "messages": [
    {"id": 1, "type": "message", "date": "2024-01-15T10:30:00", "date_unixtime": "1705314600", "from": "Bob", "from_id": "user42", "text": "Hello!"},
    {"id": 2, "type": "service", "date": "2024-01-15T10:30:30", "actor": "Bob", "actor_id": "user42", "action": "phone_call", "text": ""},
    {"id": 3, "type": "message", "date": "2024-01-15T10:31:00", "date_unixtime": "1705314660", "from": "Alice", "from_id": "user7", "text": ["Hi ", {"type": "bold", "text": "Bob"}, "!"]},
    {"id": 4, "type": "message", "date": "2024-01-15T10:32:00", "date_unixtime": "1705314720", "from": "Alice", "from_id": "user7", "media_type": "voice_message", "mime_type": "audio/ogg", "duration_seconds": 3, "text": ""}
  ]
}"#;
    fs::write(dir.path().join("result.json"), chat).unwrap();

    let unicode = r#"{"name": "Иван", "type": "personal_chat", "id": 8, "messages": [
    {"id": 1, "type": "message", "date": "2024-01-15T10:30:00", "from": "Иван", "from_id": "user8", "text": "Привет! 🎉"},
    {"id": 2, "type": "message", "date": "2024-01-15T10:31:00", "from": "田中", "from_id": "user9", "text": "こんにちは"}
]}"#;
    fs::write(dir.path().join("unicode.json"), unicode).unwrap();

    let empty = r#"{"name": "Empty", "type": "personal_chat", "id": 1, "messages": []}"#;
    fs::write(dir.path().join("empty.json"), empty).unwrap();

    let broken = r#"{"name": "Broken", "type": "personal_chat", "messages": []}"#;
    fs::write(dir.path().join("broken.json"), broken).unwrap();

    dir
}

fn tgchat_cmd() -> Command {
    Command::cargo_bin("tgchat").expect("Failed to find tgchat binary")
}

fn path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

// ============================================================================
// Summary output
// ============================================================================

#[test]
fn test_summary_is_default() {
    let dir = setup_fixtures();

    tgchat_cmd()
        .arg(path(&dir, "result.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Partner:      Bob (user42)"))
        .stdout(predicate::str::contains("First person: Alice (user7)"))
        .stdout(predicate::str::contains("Messages:     3"))
        .stdout(predicate::str::contains("With media:   1"));
}

#[test]
fn test_summary_keep_service() {
    let dir = setup_fixtures();

    tgchat_cmd()
        .arg(path(&dir, "result.json"))
        .arg("--keep-service")
        .assert()
        .success()
        .stdout(predicate::str::contains("Messages:     4"));
}

#[test]
fn test_summary_empty_chat() {
    let dir = setup_fixtures();

    tgchat_cmd()
        .arg(path(&dir, "empty.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("First person: (unknown)"))
        .stdout(predicate::str::contains("Messages:     0"));
}

// ============================================================================
// Text and JSON output
// ============================================================================

#[test]
fn test_text_output() {
    let dir = setup_fixtures();

    tgchat_cmd()
        .arg(path(&dir, "result.json"))
        .args(["-f", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[2024-01-15 10:30:00] Bob: Hello!"))
        .stdout(predicate::str::contains("[2024-01-15 10:31:00] Alice: Hi Bob!"))
        .stdout(predicate::str::contains("Alice:  [voice_message]"))
        .stdout(predicate::str::contains("phone_call").not());
}

#[test]
fn test_text_output_unicode() {
    let dir = setup_fixtures();

    tgchat_cmd()
        .arg(path(&dir, "unicode.json"))
        .args(["-f", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Иван: Привет! 🎉"))
        .stdout(predicate::str::contains("田中: こんにちは"));
}

#[test]
fn test_json_output_to_file() {
    let dir = setup_fixtures();
    let out = path(&dir, "conversation.json");

    tgchat_cmd()
        .arg(path(&dir, "result.json"))
        .args(["-f", "json", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["partner_name"], "Bob");
    assert_eq!(json["first_person_id"], "user7");
    assert_eq!(json["messages"].as_array().unwrap().len(), 3);
    assert_eq!(json["messages"][1]["text"], "Hi Bob!");
    assert_eq!(json["messages"][1]["fragments"][1]["type"], "bold");
}

#[test]
fn test_streaming_output() {
    let dir = setup_fixtures();

    tgchat_cmd()
        .arg(path(&dir, "result.json"))
        .arg("--streaming")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob: Hello!"))
        .stdout(predicate::str::contains("Alice: Hi Bob!"))
        .stdout(predicate::str::contains("Partner:").not());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_file() {
    tgchat_cmd()
        .arg("/nonexistent/result.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_broken_export() {
    let dir = setup_fixtures();

    tgchat_cmd()
        .arg(path(&dir, "broken.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode Telegram conversation"))
        .stderr(predicate::str::contains("id"));
}

#[test]
fn test_invalid_format_flag() {
    tgchat_cmd()
        .args(["result.json", "-f", "xml"])
        .assert()
        .failure();
}

#[test]
fn test_help_and_version() {
    tgchat_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--streaming"));

    tgchat_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
