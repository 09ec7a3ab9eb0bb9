use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use opentelemetry_proto::tonic::collector::logs::v1::ExportLogsServiceRequest;
use opentelemetry_proto::tonic::common::v1::any_value::Value;
use prost::Message;

const EVENTS: &str = concat!(
    r#"{"@t":"2026-02-01T10:00:00.000+01:00","@mt":"Order {OrderId} shipped","@l":"Information","OrderId":1042,"SourceContext":"App.Orders"}"#,
    "\n",
    r#"{"@t":"2026-02-01T10:00:01Z","@mt":"Cache miss for {Key}","@l":"Debug","Key":"user:7","SourceContext":"Lib.Cache"}"#,
    "\n",
    "this line is not json\n",
    r#"{"@t":"2026-02-01T10:00:02Z","@mt":"Payment failed","@l":"Error","@x":"System.TimeoutException: gateway timeout\n   at Pay()","@tr":"4bf92f3577b34da6a3ce929d0e0e4736","@sp":"00f067aa0ba902b7","SourceContext":"App.Payments"}"#,
    "\n",
);

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_logbridge")
}

// Every run points at a config file that does not exist so the host's own
// configuration never leaks into the assertions.
fn command(temp: &Path) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env("LOGBRIDGE_CONFIG", temp.join("missing.toml"))
        .env_remove("LOGBRIDGE_INCLUDED_DATA")
        .env_remove("LOGBRIDGE_MIN_LEVEL")
        .env_remove("LOGBRIDGE_SERVICE_NAME")
        .env_remove("LOGBRIDGE_DECIMAL_SEPARATOR")
        .env_remove("LOGBRIDGE_GROUP_SEPARATOR");
    cmd
}

fn run_with_stdin(mut cmd: Command, stdin: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn convert_json_lines_from_stdin() {
    let temp = tempfile::tempdir().unwrap();
    let mut cmd = command(temp.path());
    cmd.env("RUST_LOG", "warn").args(["convert", "--min-level", "info"]);
    let out = run_with_stdin(cmd, EVENTS);
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);

    assert_eq!(lines[0]["body"], "Order 1042 shipped");
    assert_eq!(lines[0]["severity_text"], "Information");
    assert_eq!(lines[0]["severity_number"], 9);
    assert_eq!(lines[0]["scope"], "App.Orders");
    assert_eq!(lines[0]["timestamp"], "2026-02-01T09:00:00Z");

    assert_eq!(lines[1]["severity_number"], 17);
    assert_eq!(lines[1]["trace_id"], "4bf92f3577b34da6a3ce929d0e0e4736");
    let keys: Vec<_> = lines[1]["attributes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        keys,
        vec![
            "exception.type",
            "exception.message",
            "exception.stacktrace",
            "message_template.text"
        ]
    );

    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("skipping malformed event"));
}

#[test]
fn convert_otlp_file_groups_by_scope() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("events.clef");
    let output = temp.path().join("logs.pb");
    fs::write(&input, EVENTS).unwrap();

    let out = command(temp.path())
        .arg("convert")
        .arg(&input)
        .args(["--format", "otlp", "--service", "shop", "--scope", "App.*"])
        .args(["--include", "default,message_template_md5_hash_attribute"])
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();
    assert!(out.status.success());

    let bytes = fs::read(&output).unwrap();
    let request = ExportLogsServiceRequest::decode(bytes.as_slice()).unwrap();
    let resource_logs = &request.resource_logs[0];

    let service = &resource_logs.resource.as_ref().unwrap().attributes[0];
    assert_eq!(service.key, "service.name");
    assert_eq!(
        service.value.as_ref().and_then(|v| v.value.clone()),
        Some(Value::StringValue("shop".to_string()))
    );

    let scopes: Vec<_> = resource_logs
        .scope_logs
        .iter()
        .map(|s| s.scope.as_ref().unwrap().name.clone())
        .collect();
    assert_eq!(scopes, vec!["App.Orders", "App.Payments"]);

    let payment = &resource_logs.scope_logs[1].log_records[0];
    assert_eq!(payment.severity_number, 17);
    assert_eq!(payment.trace_id.len(), 16);
    assert_eq!(payment.span_id.len(), 8);
    assert!(
        payment
            .attributes
            .iter()
            .any(|kv| kv.key == "message_template.hash.md5")
    );
}

#[test]
fn convert_otlp_without_output_fails() {
    let temp = tempfile::tempdir().unwrap();
    let out = command(temp.path())
        .args(["convert", "--format", "otlp"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--output"));
}

#[test]
fn config_file_sets_template_body() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("config.toml");
    fs::write(&config, "included_data = \"template_body\"\n").unwrap();

    let mut cmd = command(temp.path());
    cmd.env("LOGBRIDGE_CONFIG", &config).arg("convert");
    let out = run_with_stdin(
        cmd,
        r#"{"@t":"2026-02-01T10:00:00Z","@mt":"Hello {Name}","Name":"ada"}"#,
    );
    assert!(out.status.success());

    let line: serde_json::Value =
        serde_json::from_str(String::from_utf8(out.stdout).unwrap().trim()).unwrap();
    assert_eq!(line["body"], "Hello {Name}");
    assert_eq!(line["attributes"].as_array().unwrap().len(), 1);
}

#[test]
fn hash_prints_md5() {
    let temp = tempfile::tempdir().unwrap();
    let out = command(temp.path()).args(["hash", "abc"]).output().unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap().trim(),
        "900150983cd24fb0d6963f7d28e17f72"
    );
}

#[test]
fn flags_reports_effective_configuration() {
    let temp = tempfile::tempdir().unwrap();
    let out = command(temp.path())
        .env("LOGBRIDGE_INCLUDED_DATA", "span_id_field")
        .args(["flags", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["effective"], "span_id_field");
    assert_eq!(value["flags"].as_array().unwrap().len(), 8);
}
