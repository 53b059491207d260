//! CLI tests for `schemashift convert` and `schemashift check`
//!
//! Runs the built binary against schema files in a temp directory.

use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn schemashift_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_schemashift"))
}

fn run_cli(args: &[&str], envs: &[(&str, &str)], home: &Path) -> Output {
    let mut cmd = Command::new(schemashift_bin());
    cmd.args(args);
    cmd.env("SCHEMASHIFT_HOME", home);
    cmd.env_remove("RUST_LOG");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("failed to execute schemashift CLI")
}

fn run_cli_stdin(args: &[&str], stdin: &str, home: &Path) -> Output {
    let mut child = Command::new(schemashift_bin())
        .args(args)
        .env("SCHEMASHIFT_HOME", home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn schemashift CLI");
    child
        .stdin
        .take()
        .expect("stdin pipe")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for schemashift CLI")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "failed to parse JSON output: {}\nstdout:\n{}",
            err,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn write_schema(dir: &Path, name: &str, schema: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(schema).unwrap()).unwrap();
    path
}

fn users_table() -> Value {
    json!([
        {"name": "id", "type": "INTEGER", "mode": "REQUIRED"},
        {"name": "email", "type": "STRING", "mode": "NULLABLE", "description": "Contact address"},
        {"name": "tags", "type": "STRING", "mode": "REPEATED"}
    ])
}

// =============================================================================
// CONVERT
// =============================================================================

#[test]
fn test_convert_bigquery_file_to_avro() {
    let tmp = TempDir::new().unwrap();
    let input = write_schema(tmp.path(), "users.json", &users_table());

    let output = run_cli(
        &["convert", "--from", "bigquery", "--to", "avro", input.to_str().unwrap()],
        &[],
        tmp.path(),
    );
    let avro = stdout_json(&output);

    assert_eq!(
        avro,
        json!({
            "name": "schema",
            "type": "record",
            "fields": [
                {"name": "id", "type": "long"},
                {"name": "email", "doc": "Contact address", "type": ["null", "string"]},
                {"name": "tags", "type": {"type": "array", "items": "string", "default": []}}
            ]
        })
    );
}

#[test]
fn test_convert_reads_stdin_and_defaults_destination() {
    let tmp = TempDir::new().unwrap();
    let avro = json!({
        "name": "event",
        "type": "record",
        "fields": [{"name": "age", "type": ["null", "long"]}]
    });

    let output = run_cli_stdin(&["convert", "--from", "avro", "-"], &avro.to_string(), tmp.path());
    let bigquery = stdout_json(&output);

    assert_eq!(bigquery, json!([{"name": "age", "type": "INTEGER", "mode": "NULLABLE"}]));
}

#[test]
fn test_convert_record_name_namespace_and_output_file() {
    let tmp = TempDir::new().unwrap();
    let input = write_schema(tmp.path(), "users.json", &users_table());
    let out_path = tmp.path().join("users.avsc");

    let output = run_cli(
        &[
            "convert",
            "--from",
            "bigquery",
            input.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
            "--namespace",
            "com.example",
        ],
        &[("SCHEMASHIFT_RECORD_NAME", "users")],
        tmp.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let written: Value = serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(written["name"], "users");
    assert_eq!(written["namespace"], "com.example");
    assert_eq!(written["fields"].as_array().unwrap().len(), 3);
}

#[test]
fn test_convert_compact_prints_single_line() {
    let tmp = TempDir::new().unwrap();
    let input = write_schema(tmp.path(), "users.json", &users_table());

    let output = run_cli(
        &["convert", "--from", "bigquery", "--compact", input.to_str().unwrap()],
        &[],
        tmp.path(),
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end().lines().count(), 1);
}

#[test]
fn test_convert_unmapped_type_fails_unless_allowed() {
    let tmp = TempDir::new().unwrap();
    let input = write_schema(
        tmp.path(),
        "interval.json",
        &json!([{"name": "span", "type": "INTERVAL", "mode": "NULLABLE"}]),
    );
    let path = input.to_str().unwrap();

    let output = run_cli(&["convert", "--from", "bigquery", path], &[], tmp.path());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"), "stderr: {}", stderr);
    assert!(stderr.contains("INTERVAL"), "stderr: {}", stderr);
    assert!(stderr.contains("--allow-unmapped"), "stderr: {}", stderr);

    let output = run_cli(
        &["convert", "--from", "bigquery", "--allow-unmapped", path],
        &[],
        tmp.path(),
    );
    let avro = stdout_json(&output);
    assert_eq!(avro["fields"][0], json!({"name": "span", "type": ["null", ""]}));
}

#[test]
fn test_convert_same_format_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let input = write_schema(tmp.path(), "users.json", &users_table());

    let output = run_cli(
        &["convert", "--from", "bigquery", "--to", "bigquery", input.to_str().unwrap()],
        &[],
        tmp.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not supported"));
}

#[test]
fn test_convert_wrong_shape_suggests_other_format() {
    let tmp = TempDir::new().unwrap();
    let input = write_schema(
        tmp.path(),
        "record.json",
        &json!({"name": "r", "type": "record", "fields": []}),
    );

    let output = run_cli(&["convert", "--from", "bigquery", input.to_str().unwrap()], &[], tmp.path());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--from avro"), "stderr: {}", stderr);
}

#[test]
fn test_convert_missing_file() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.json");

    let output = run_cli(&["convert", "--from", "avro", missing.to_str().unwrap()], &[], tmp.path());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File not found"), "stderr: {}", stderr);
}

#[test]
fn test_convert_reports_location_of_bad_mode() {
    let tmp = TempDir::new().unwrap();
    let input = write_schema(
        tmp.path(),
        "bad_mode.json",
        &json!([{"name": "a", "type": "RECORD", "fields": [
            {"name": "b", "type": "STRING", "mode": "SOMETIMES"}
        ]}]),
    );

    let output = run_cli(&["convert", "--from", "bigquery", input.to_str().unwrap()], &[], tmp.path());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("$[0].fields[0].mode"), "stderr: {}", stderr);
    assert!(stderr.contains("SOMETIMES"), "stderr: {}", stderr);
}

#[test]
fn test_log_file_failure_keeps_stderr_logging() {
    let tmp = TempDir::new().unwrap();
    let input = write_schema(tmp.path(), "users.json", &users_table());
    let blocked_home = tmp.path().join("home");
    fs::write(&blocked_home, "not a directory").unwrap();

    let output = run_cli(
        &["-v", "--log-file", "convert", "--from", "bigquery", input.to_str().unwrap()],
        &[("SCHEMASHIFT_HOME", blocked_home.to_str().unwrap())],
        tmp.path(),
    );
    let avro = stdout_json(&output);
    assert_eq!(avro["fields"].as_array().unwrap().len(), 3);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File logging disabled"), "stderr: {}", stderr);
    assert!(stderr.contains("Converting schema"), "stderr: {}", stderr);
}

#[test]
fn test_convert_rejects_unknown_format_flag() {
    let tmp = TempDir::new().unwrap();
    let output = run_cli(&["convert", "--from", "protobuf", "-"], &[], tmp.path());
    assert!(!output.status.success());
}

// =============================================================================
// CHECK
// =============================================================================

#[test]
fn test_check_json_reports_fields_and_depth() {
    let tmp = TempDir::new().unwrap();
    let input = write_schema(
        tmp.path(),
        "nested.json",
        &json!([
            {"name": "id", "type": "INT64"},
            {"name": "address", "type": "STRUCT", "fields": [
                {"name": "city", "type": "STRING"}
            ]}
        ]),
    );

    let output = run_cli(
        &["check", "--format", "bigquery", "--json", input.to_str().unwrap()],
        &[],
        tmp.path(),
    );
    let report = stdout_json(&output);

    assert_eq!(report, json!({"format": "bigquery", "fields": 2, "depth": 2}));
}

#[test]
fn test_check_depth_limit_from_env() {
    let tmp = TempDir::new().unwrap();
    let mut schema = json!([{"name": "leaf", "type": "STRING"}]);
    for level in 0..5 {
        schema = json!([{"name": format!("n{}", level), "type": "RECORD", "fields": schema}]);
    }
    let input = write_schema(tmp.path(), "deep.json", &schema);

    let output = run_cli(
        &["check", "--format", "bigquery", input.to_str().unwrap()],
        &[("SCHEMASHIFT_MAX_DEPTH", "3")],
        tmp.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("maximum depth of 3"));
}

#[test]
fn test_check_json_error_payload() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("broken.json");
    fs::write(&input, "{\"name\": ").unwrap();

    let output = run_cli(
        &["check", "--format", "avro", "--json", input.to_str().unwrap()],
        &[],
        tmp.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    let payload: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(payload["error"]["message"]
        .as_str()
        .unwrap()
        .contains("not valid JSON"));
    assert!(!payload["error"]["suggestions"].as_array().unwrap().is_empty());
}
