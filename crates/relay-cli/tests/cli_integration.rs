//! Integration tests for the relay CLI.
//!
//! The library-level tests drive `run_with_client` with a scripted client;
//! the binary tests run `relay` itself against a mock completion endpoint.

use std::path::Path;
use std::sync::Mutex;

use assert_cmd::Command;
use async_trait::async_trait;
use predicates::prelude::*;
use relay_cli::commands::workflow::{run_with_client, RunOptions};
use relay_core::error::{CallError, RelayError};
use relay_core::workflow::{ChatRole, CompletionClient, CompletionReply, CompletionRequest};
use relay_core::{PhaseId, Roster, Settings};

/// Replies `R1`..`R5` in call order, optionally failing on call `fail_on`.
struct ScriptedClient {
    calls: Mutex<Vec<CompletionRequest>>,
    fail_on: Option<usize>,
}

impl ScriptedClient {
    fn new(fail_on: Option<usize>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, CallError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(request.clone());
        let n = calls.len();
        if self.fail_on == Some(n) {
            return Err(CallError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(CompletionReply {
            content: format!("R{n}"),
            model: request.model.clone(),
            usage: None,
        })
    }
}

fn test_settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "OPENAI_MODEL" => Some("gpt-test".to_string()),
        _ => None,
    })
    .unwrap()
}

fn files_in(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn test_run_writes_one_results_file_with_all_phases() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(None);
    let opts = RunOptions {
        output_dir: dir.path().to_path_buf(),
        ..RunOptions::default()
    };
    let mut console: Vec<u8> = Vec::new();

    let path = run_with_client(&test_settings(), &Roster::builtin(), &client, &opts, &mut console)
        .await
        .unwrap();

    assert_eq!(client.call_count(), 5);
    let names = files_in(dir.path());
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("workflow_outputs_"));
    assert!(names[0].ends_with(".txt"));
    assert_eq!(path.file_name().unwrap().to_string_lossy(), names[0]);

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("Model: gpt-test"));
    let mut cursor = 0;
    for id in PhaseId::ALL {
        let header = format!("PHASE {}: {}", id.number(), id.title());
        let at = written[cursor..]
            .find(&header)
            .unwrap_or_else(|| panic!("missing or out of order: {header}"));
        cursor += at + header.len();
        let body = format!("R{}", id.number());
        assert!(written[cursor..].trim_start_matches(['-', '\n']).starts_with(&body));
    }

    let console = String::from_utf8(console).unwrap();
    assert!(console.contains("FINAL SUMMARY"));
    assert!(console.contains("Full results saved to:"));
    assert!(console.contains("Workflow completed successfully!"));
}

#[tokio::test]
async fn test_each_phase_prompt_carries_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(None);
    let opts = RunOptions {
        output_dir: dir.path().to_path_buf(),
        ..RunOptions::default()
    };

    run_with_client(&test_settings(), &Roster::builtin(), &client, &opts, &mut std::io::sink())
        .await
        .unwrap();

    let calls = client.calls.lock().unwrap();
    for (n, request) in calls.iter().enumerate().skip(1) {
        let user = request.message(ChatRole::User).unwrap();
        assert!(user.contains(&format!("R{n}")), "call {} lacks R{n}", n + 1);
    }
}

#[tokio::test]
async fn test_failed_phase_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(Some(4));
    let opts = RunOptions {
        output_dir: dir.path().to_path_buf(),
        ..RunOptions::default()
    };

    let err = run_with_client(&test_settings(), &Roster::builtin(), &client, &opts, &mut std::io::sink())
        .await
        .unwrap_err();

    match err {
        RelayError::Workflow(failure) => {
            assert_eq!(failure.phase, PhaseId::Review);
            assert_eq!(failure.completed.len(), 3);
            assert!(!failure.completed.contains(PhaseId::Review));
            assert!(!failure.completed.contains(PhaseId::Marketing));
        }
        other => panic!("expected workflow failure, got {other:?}"),
    }
    assert_eq!(client.call_count(), 4);
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn test_missing_api_key_exits_with_config_error() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("relay")
        .unwrap()
        .env_clear()
        .env("RELAY_ENV_FILE", dir.path().join("absent.env"))
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration validation failed"));

    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn test_invalid_setting_exits_before_any_completion_call() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "unused"}}]}"#)
        .expect(0)
        .create();

    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("relay")
        .unwrap()
        .env_clear()
        .env("RELAY_ENV_FILE", dir.path().join("absent.env"))
        .env("OPENAI_API_KEY", "sk-test")
        .env("OPENAI_API_BASE", server.url())
        .env("AGENT_TEMPERATURE", "5")
        .arg("run")
        .arg("--output-dir")
        .arg(dir.path())
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration validation failed"))
        .stderr(predicate::str::contains("AGENT_TEMPERATURE"));

    mock.assert();
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn test_placeholder_api_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join("test.env");
    std::fs::write(&env_file, "OPENAI_API_KEY=your-api-key-here\n").unwrap();

    Command::cargo_bin("relay")
        .unwrap()
        .env_clear()
        .arg("--env-file")
        .arg(&env_file)
        .arg("validate")
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_agents_lists_roster_without_api_key() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("relay")
        .unwrap()
        .env_clear()
        .env("RELAY_ENV_FILE", dir.path().join("absent.env"))
        .arg("agents")
        .assert()
        .success()
        .stdout(predicate::str::contains("Market Research Analyst"))
        .stdout(predicate::str::contains("Go-To-Market Strategist"));
}

#[test]
fn test_run_against_mock_endpoint() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Mocked insight."}}]}"#)
        .expect(5)
        .create();

    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("relay")
        .unwrap()
        .env_clear()
        .env("RELAY_ENV_FILE", dir.path().join("absent.env"))
        .env("OPENAI_API_KEY", "sk-test")
        .env("OPENAI_API_BASE", format!("{}/v1", server.url()))
        .arg("run")
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PHASE 5: MARKETING STRATEGY"))
        .stdout(predicate::str::contains("Workflow completed successfully!"));

    mock.assert();
    let names = files_in(dir.path());
    assert_eq!(names.len(), 1);
    let written = std::fs::read_to_string(dir.path().join(&names[0])).unwrap();
    assert_eq!(written.matches("Mocked insight.").count(), 5);
}

#[test]
fn test_endpoint_error_exits_with_1_and_writes_nothing() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
        .create();

    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("relay")
        .unwrap()
        .env_clear()
        .env("RELAY_ENV_FILE", dir.path().join("absent.env"))
        .env("OPENAI_API_KEY", "sk-bad")
        .env("OPENAI_API_BASE", server.url())
        .arg("run")
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Troubleshooting:"))
        .stderr(predicate::str::contains("Incorrect API key"));

    assert!(files_in(dir.path()).is_empty());
}
