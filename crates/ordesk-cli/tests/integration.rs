use assert_cmd::Command;
use predicates::prelude::*;

fn ordesk() -> Command {
    Command::cargo_bin("ordesk").unwrap()
}

// ---------------------------------------------------------------------------
// help / version
// ---------------------------------------------------------------------------

#[test]
fn help_lists_subcommands() {
    ordesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("orders"));
}

#[test]
fn version_flag_works() {
    ordesk().arg("--version").assert().success();
}

// ---------------------------------------------------------------------------
// ordesk orders
// ---------------------------------------------------------------------------

#[test]
fn orders_lists_seeded_store() {
    ordesk()
        .arg("orders")
        .assert()
        .success()
        .stdout(predicate::str::contains("12345"))
        .stdout(predicate::str::contains("67890"))
        .stdout(predicate::str::contains("Juan Pérez"));
}

#[test]
fn orders_json_is_valid_json() {
    let output = ordesk().args(["orders", "--json"]).output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["12345"]["status"], "processing");
    assert_eq!(parsed["67890"]["status"], "shipped");
}

// ---------------------------------------------------------------------------
// configuration errors
// ---------------------------------------------------------------------------

#[test]
fn run_without_api_key_fails_with_clear_error() {
    ordesk()
        .env_remove("OPENAI_API_KEY")
        .args(["run", "Cambiar dirección orden #12345 a Calle Nueva 123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn eval_without_api_key_fails_with_clear_error() {
    ordesk()
        .env_remove("OPENAI_API_KEY")
        .arg("eval")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

// ---------------------------------------------------------------------------
// ordesk eval
// ---------------------------------------------------------------------------

// Points the client at an unreachable local endpoint: every scenario run
// folds the transport error into an aborted report, so the command still
// completes and persists the full battery.
#[test]
fn eval_writes_json_report_even_when_llm_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("eval_results.json");

    ordesk()
        .env("OPENAI_API_KEY", "sk-test")
        .env("OPENAI_BASE_URL", "http://127.0.0.1:9")
        .args(["eval", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("report written to"));

    let written = std::fs::read_to_string(&output).unwrap();
    let report: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(report["total"], 4);
    assert_eq!(report["results"].as_array().unwrap().len(), 4);
    assert!(report["generated_at"].is_string());
}
