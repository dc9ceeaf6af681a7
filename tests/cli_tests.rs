//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn wsdlschema_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_wsdlschema"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn fixture(name: &str) -> String {
    fixtures_dir()
        .join(format!("{}.wsdl", name))
        .to_str()
        .unwrap()
        .to_string()
}

fn run(args: &[&str]) -> Output {
    Command::new(wsdlschema_bin())
        .args(args)
        .output()
        .expect("Failed to execute wsdlschema")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

// ============================================================================
// Inspect Command Tests
// ============================================================================

#[test]
fn test_cli_inspect_basic() {
    let output = run(&["inspect", &fixture("authentication")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect failed: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Service Information:"));
    assert!(stdout.contains("Name: AuthenticationWebServiceImplService"));
    assert!(stdout.contains("Target Namespace: http://v1_0.ws.auth.order.example.com/"));
    assert!(stdout.contains("Endpoint: http://example.com/validation/1.0/AuthenticationService"));
    assert!(stdout.contains("Style: document"));
    assert!(stdout.contains("Operations: 1"));
}

#[test]
fn test_cli_inspect_json_output() {
    let output = run(&["inspect", &fixture("no_namespace"), "--json"]);
    assert!(output.status.success());

    let json = json_stdout(&output);
    assert_eq!(json["namespace"], "urn:ActionWebService");
    assert_eq!(json["serviceName"], "Api");
    assert_eq!(json["endpoint"], "http://example.com/api/api");
    assert_eq!(json["style"], "rpc");
    assert_eq!(json["elementFormDefault"], "unqualified");
    assert_eq!(json["statistics"]["operations"], 3);
    assert_eq!(json["statistics"]["types"], 4);
    assert_eq!(json["statistics"]["unresolvedExtensions"], 0);
}

// ============================================================================
// Operations Command Tests
// ============================================================================

#[test]
fn test_cli_operations_text() {
    let output = run(&["operations", &fixture("no_namespace")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("=== Operations ==="));
    assert!(stdout.contains("get_user_login_by_id"));
    assert!(stdout.contains("Action: /api/api/GetUserLoginById"));
    assert!(stdout.contains("- api_key : xsd:string"));
}

#[test]
fn test_cli_operations_json() {
    let output = run(&["operations", &fixture("savon295"), "--json"]);
    assert!(output.status.success());

    let json = json_stdout(&output);
    assert_eq!(json["sendsms"]["action"], "sendsms");
    let parameters = json["sendsms"]["parameters"]
        .as_object()
        .expect("parameters should be an object");
    assert_eq!(parameters.len(), 9);
    assert!(parameters.contains_key("dlrurl"));
}

// ============================================================================
// Types Command Tests
// ============================================================================

#[test]
fn test_cli_types_text() {
    let output = run(&["types", &fixture("no_namespace")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("=== Types ==="));
    assert!(stdout.contains("{urn:ActionWebService}MpUser (all of 8)"));
    assert!(stdout.contains("{urn:ActionWebService}McContactArray (no members)"));
}

#[test]
fn test_cli_types_namespace_filter() {
    let output = run(&[
        "types",
        &fixture("multiple_namespaces"),
        "--namespace",
        "http://example.com/article",
        "--json",
    ]);
    assert!(output.status.success());

    let json = json_stdout(&output);
    let namespaces = json.as_object().expect("output should be an object");
    assert_eq!(namespaces.len(), 1);
    assert_eq!(
        json["http://example.com/article"]["Article"]["order"],
        serde_json::json!(["Author", "Title"])
    );
}

#[test]
fn test_cli_types_pseudo() {
    let ns = "http://bedrift.telefonkatalogen.no";

    let output = run(&["types", &fixture("savon295"), "--json"]);
    assert!(output.status.success());
    assert!(json_stdout(&output).get(ns).is_none());

    let output = run(&["types", &fixture("savon295"), "--pseudo", "--json"]);
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json[ns]["&sendsmsType"]["order"].as_array().map(Vec::len), Some(9));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_cli_inspect_nonexistent_file() {
    let output = run(&["inspect", "/nonexistent/service.wsdl"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_cli_remote_location_rejected() {
    let output = run(&["inspect", "http://example.com/service?wsdl"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("not allowed"));
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("operations"));
    assert!(stdout.contains("types"));
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("wsdlschema"));
}
