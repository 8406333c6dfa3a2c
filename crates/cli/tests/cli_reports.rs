use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SERVICE: &str = r#"import requests


class PaymentClient:
    def charge(self, amount):
        try:
            return requests.post("/charge", json={"amount": amount})
        except:
            return None
"#;

#[allow(deprecated)]
fn run_cli(root: &Path, args: &[&str]) -> (bool, Value) {
    let output = Command::cargo_bin("code-insight")
        .expect("binary")
        .env_remove("CODE_INSIGHT_ROOT")
        .env_remove("CODE_INSIGHT_CONTEXT_WINDOW")
        .env_remove("CODE_INSIGHT_CACHE_CAPACITY")
        .arg("--quiet")
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("command run");

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}

fn setup_repo() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("billing")).unwrap();
    fs::write(temp.path().join("billing/client.py"), SERVICE).unwrap();
    temp
}

#[test]
fn entity_report_is_json() {
    let temp = setup_repo();
    let (ok, body) = run_cli(temp.path(), &["entity", "PaymentClient"]);

    assert!(ok);
    assert_eq!(body["entity_name"], "PaymentClient");
    assert_eq!(body["location"]["start_line"], 4);
    assert_eq!(body["location"]["entity_kind"], "class");
    assert_eq!(body["risk_analysis"]["correctness_issues"][0]["severity"], "high");
    assert!(body["confidence_score"].as_u64().unwrap() <= 100);
}

#[test]
fn method_flag_narrows_entity() {
    let temp = setup_repo();
    let (ok, body) = run_cli(
        temp.path(),
        &["entity", "PaymentClient", "--method", "charge", "--file", "billing/client.py"],
    );

    assert!(ok);
    assert_eq!(body["method_name"], "charge");
    assert!(body["purpose_analysis"]["api_surface"].is_null());
}

#[test]
fn missing_entity_prints_error_document() {
    let temp = setup_repo();
    let (ok, body) = run_cli(temp.path(), &["entity", "RefundClient"]);

    assert!(!ok);
    assert_eq!(body["kind"], "not_found");
    assert!(!body["suggestions"].as_array().unwrap().is_empty());
}

#[test]
fn line_report_and_line_errors() {
    let temp = setup_repo();

    let (ok, body) = run_cli(
        temp.path(),
        &["lines", "billing/client.py", "6-7", "-q", "Can this fail?", "--window", "5"],
    );
    assert!(ok);
    assert_eq!(body["location"]["target_lines"], "6-7");
    assert_eq!(body["location"]["detected_kind"], "python");
    assert_eq!(body["question"], "Can this fail?");

    let (ok, body) = run_cli(temp.path(), &["lines", "billing/client.py", "7-2"]);
    assert!(!ok);
    assert_eq!(body["kind"], "invalid_line_spec");

    let (ok, body) = run_cli(temp.path(), &["lines", "billing/client.py", "400"]);
    assert!(!ok);
    assert_eq!(body["details"]["valid_range"], "1-9");
}

#[allow(deprecated)]
#[test]
fn invalid_config_file_fails_before_analysis() {
    let temp = setup_repo();
    fs::write(temp.path().join("code-insight.toml"), "context_window = 1\n").unwrap();

    Command::cargo_bin("code-insight")
        .expect("binary")
        .env_remove("CODE_INSIGHT_CONTEXT_WINDOW")
        .arg("--root")
        .arg(temp.path())
        .args(["entity", "PaymentClient"])
        .assert()
        .failure();
}
