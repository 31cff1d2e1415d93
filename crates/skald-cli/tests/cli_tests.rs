//! Command-line tests.
//!
//! The CLI is a binary crate, so these drive the built `skald` executable
//! against a temporary platform directory and kernel module.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use skald_ir::{ClbitId, Function, Module, QubitId};
use tempfile::TempDir;

fn skald(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_skald"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run skald")
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let platforms = dir.path().join("platforms");
    fs::create_dir(&platforms).unwrap();
    fs::write(platforms.join("loopback.config"), "CODEGEN_EMISSION=qasm2\n").unwrap();

    let mut bell = Function::new("bell", 2, 2);
    bell.h(QubitId(0)).unwrap();
    bell.cx(QubitId(0), QubitId(1)).unwrap();
    bell.measure(QubitId(0), ClbitId(0)).unwrap();
    bell.measure(QubitId(1), ClbitId(1)).unwrap();
    let mut module = Module::new("kernels");
    module.push_function(bell).unwrap();
    fs::write(dir.path().join("kernels.json"), module.to_text().unwrap()).unwrap();
    dir
}

fn path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[test]
fn test_lower_prints_qasm() {
    let dir = workspace();
    let out = skald(&[
        "--platform-dir",
        &path(&dir, "platforms"),
        "lower",
        "-i",
        &path(&dir, "kernels.json"),
        "-k",
        "bell",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("// ---- bell ----"));
    assert!(stdout.contains("OPENQASM 2.0;"));
    assert!(stdout.contains("cx q[0],q[1];"));
}

#[test]
fn test_lower_writes_artifacts() {
    let dir = workspace();
    let out_dir = path(&dir, "out");
    let out = skald(&[
        "--platform-dir",
        &path(&dir, "platforms"),
        "lower",
        "-i",
        &path(&dir, "kernels.json"),
        "-k",
        "bell",
        "-o",
        &out_dir,
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(Path::new(&out_dir).join("bell.qasm").exists());
}

#[test]
fn test_launch_json_results() {
    let dir = workspace();
    let out = skald(&[
        "--platform-dir",
        &path(&dir, "platforms"),
        "launch",
        "-i",
        &path(&dir, "kernels.json"),
        "-k",
        "bell",
        "-b",
        "loopback;outcome;11",
        "-s",
        "20",
        "--json",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["results"][0]["label"], "bell");
    assert_eq!(value["results"][0]["counts"]["11"], 20);
}

#[test]
fn test_malformed_selector_fails() {
    let dir = workspace();
    let out = skald(&[
        "--platform-dir",
        &path(&dir, "platforms"),
        "lower",
        "-i",
        &path(&dir, "kernels.json"),
        "-k",
        "bell",
        "-b",
        "ibm;onlykey",
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("key-value pairs"));
}

#[test]
fn test_trace_reports_measurements() {
    let dir = workspace();
    let out = skald(&["trace", "-i", &path(&dir, "kernels.json"), "-k", "bell", "--outcome", "1"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("alloc q0"));
    assert!(stdout.contains("Measured: 11"));
}

#[test]
fn test_version() {
    let out = skald(&["version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("skald-platform"));
}
