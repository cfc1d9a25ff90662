//! Integration tests for commands that need no running services

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn localagent_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("localagent").unwrap();
    cmd.env("LOCALAGENT_CONFIG", config_dir.path().join("config.yml"))
        .env_remove("LOCALAGENT_ROUTING_POLICY")
        .env_remove("LOCALAGENT_RELEVANCE_POLICY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    localagent_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("ingest"));
}

#[test]
fn test_route_greeting_is_direct() {
    let dir = TempDir::new().unwrap();
    localagent_cmd(&dir)
        .args(["route", "--routing", "pattern_default", "hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[direct] via pattern_default"));
}

#[test]
fn test_route_current_events_json() {
    let dir = TempDir::new().unwrap();
    let output = localagent_cmd(&dir)
        .args([
            "route",
            "--routing",
            "pattern_default",
            "--format",
            "json",
            "latest",
            "stock",
            "price",
            "of",
            "ACME",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["route"], "web");
    assert_eq!(value["question"], "latest stock price of ACME");
}

#[test]
fn test_route_keyword_set_default() {
    let dir = TempDir::new().unwrap();
    localagent_cmd(&dir)
        .args(["route", "How", "does", "Elasticsearch", "store", "vectors?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[knowledge_base] via keyword_set"));
}

#[test]
fn test_route_uses_policy_from_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.yml"),
        "routing:\n  policy: pattern_default\n",
    )
    .unwrap();

    localagent_cmd(&dir)
        .args(["route", "tell me about replicas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[knowledge_base] via pattern_default"));
}

#[test]
fn test_partial_service_sections_accepted() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.yml"),
        "llm:\n  model: qwen2.5\nsearch:\n  index: docs\n",
    )
    .unwrap();

    let output = localagent_cmd(&dir)
        .args(["--format", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["llm"]["model"], "qwen2.5");
    assert_eq!(value["search"]["index"], "docs");
    assert!(value["search"]["url"].is_string());

    localagent_cmd(&dir)
        .args(["route", "hi"])
        .assert()
        .success();
}

#[test]
fn test_unknown_routing_policy_rejected() {
    let dir = TempDir::new().unwrap();
    localagent_cmd(&dir)
        .args(["route", "--routing", "coin_flip", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown routing policy"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();

    localagent_cmd(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(dir.path().join("config.yml").exists());

    localagent_cmd(&dir)
        .args(["config", "init"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));

    localagent_cmd(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();

    let output = localagent_cmd(&dir)
        .args(["--format", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["search"]["top_k"], 4);
    assert_eq!(value["relevance"]["min_chars"], 50);
}

#[test]
fn test_invalid_config_exits_with_input_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.yml"), "search: [not, a, map]\n").unwrap();

    localagent_cmd(&dir)
        .args(["route", "hi"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_empty_question_rejected() {
    let dir = TempDir::new().unwrap();
    localagent_cmd(&dir)
        .args(["ask", "   "])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("question is empty"));
}
