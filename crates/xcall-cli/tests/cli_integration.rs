//! Integration tests for the `xcall` binary.

use std::io::Write;
use std::process::{Command, Output};

fn xcall(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xcall"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("XCALL_LOG")
        .output()
        .expect("failed to spawn xcall")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_call_delivers_result() {
    let output = xcall(&["call", "NoParamReturnBool"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "true");
}

#[test]
fn test_call_unknown_name() {
    let output = xcall(&["call", "unknown-name", "--log-level", "error"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("no result delivered"));
}

#[test]
fn test_run_passes() {
    let output = xcall(&["run", "--log-level", "error"]);
    assert!(output.status.success(), "{}", stdout(&output));
    let text = stdout(&output);
    assert!(text.contains("117 passed"));
    assert!(!text.contains("failed"));
}

#[test]
fn test_run_filtered() {
    let output = xcall(&["run", "--direction", "forward", "--filter", "ParamRef"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("ParamRefArrays"));
    assert!(text.contains("11 total"));
}

#[test]
fn test_list_managed() {
    let output = xcall(&["list", "--side", "managed"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("cross_call_worker"));
    assert!(text.contains("ParamRef2(ref int32, ref float32)"));
    assert!(!text.contains("DeliverResult"));
}

#[test]
fn test_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[boundary]\nmax_call_depth = 8\n\n[logging]\nlevel = \"warn\"").unwrap();
    let path = file.path().to_str().unwrap();

    let output = xcall(&["--config", path, "call", "ParamRef1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "42");
}

#[test]
fn test_invalid_config_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[boundary]\nmax_call_depth = 0").unwrap();
    let path = file.path().to_str().unwrap();

    let output = xcall(&["--config", path, "list"]);
    assert!(!output.status.success());
}
