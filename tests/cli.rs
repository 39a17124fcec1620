use std::{io::Write, process::Command};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const USAGE: &str = "Usage: json_to_cloudposse.py <path_to_json_file>\n";

fn cmd() -> Command {
  Command::new(env!("CARGO_BIN_EXE_json_to_cloudposse"))
}

fn policy_file(content: &str) -> NamedTempFile {
  let mut file = NamedTempFile::new().expect("failed to create temp file");
  file.write_all(content.as_bytes()).expect("failed to write temp file");
  file
}

#[test]
fn converts_policy_file() {
  let file = policy_file(r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"s3:GetObject","Resource":"*"}]}"#);

  let expected = r#"iam_policy = [
  {
    version = "2012-10-17",
    statements = [
      {
        effect = "Allow",
        actions = ["s3:GetObject"],
        resources = ["*"]
      }
    ]
  }
]

"#;

  cmd().arg(file.path()).assert().success().stdout(expected);
}

#[test]
fn json_format() {
  let file = policy_file(r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"s3:GetObject"}]}"#);

  let output = cmd().args(["--format", "json"]).arg(file.path()).output().expect("failed to run");
  assert!(output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
  assert_eq!(value["iam_policy"][0]["statements"][0]["actions"], serde_json::json!(["s3:GetObject"]));
}

#[test]
fn missing_argument_prints_usage() {
  cmd().assert().code(1).stdout(USAGE);
}

#[test]
fn extra_argument_prints_usage() {
  cmd().args(["a.json", "b.json"]).assert().code(1).stdout(USAGE);
}

#[test]
fn help_exits_successfully() {
  cmd().arg("--help").assert().success().stdout(predicate::str::contains("path_to_json_file"));
}

#[test]
fn missing_file() {
  cmd()
    .arg("/nonexistent/policy.json")
    .assert()
    .code(1)
    .stdout("Error: File not found: /nonexistent/policy.json\n");
}

#[test]
fn invalid_json() {
  let file = policy_file("{\"Version\": ");

  cmd()
    .arg(file.path())
    .assert()
    .code(1)
    .stdout(format!("Error: Invalid JSON format in: {}\n", file.path().display()));
}

#[test]
fn missing_statement_key() {
  let file = policy_file(r#"{"Version":"2012-10-17"}"#);

  cmd()
    .arg(file.path())
    .assert()
    .code(1)
    .stdout("Error: Input JSON should be a dictionary with 'Version' and 'Statement' keys.\n")
    .stdout(predicate::str::contains("iam_policy").not());
}

#[test]
fn malformed_condition() {
  let file = policy_file(r#"{"Version":"2012-10-17","Statement":[{"Condition":"StringEquals"}]}"#);

  cmd()
    .arg(file.path())
    .assert()
    .code(1)
    .stdout(predicate::str::starts_with("Error: expected a mapping for 'Statement[0].Condition'"));
}

#[test]
fn logs_stay_off_stdout() {
  let file = policy_file(r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Unknown":"x"}]}"#);

  cmd()
    .arg("--verbose")
    .arg(file.path())
    .env_remove("RUST_LOG")
    .assert()
    .success()
    .stdout(predicate::str::starts_with("iam_policy = ["))
    .stderr(predicate::str::contains("ignoring unknown key 'Unknown'"));
}
