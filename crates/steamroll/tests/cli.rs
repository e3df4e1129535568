/*
 * cli.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the steamroll binary.
 */

//! These tests run the binary and only exercise paths that fail before any
//! request is sent, so no server is needed.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn steamroll(args: &[&str], dir: &TempDir) -> Output {
    Command::new(env!("CARGO_BIN_EXE_steamroll"))
        .args(args)
        .current_dir(dir.path())
        .output()
        .expect("Failed to run steamroll")
}

#[test]
fn version_is_reported() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let output = steamroll(&["--version"], &temp);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("steamroll "));
}

#[test]
fn create_without_document_fails() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let output = steamroll(&["event", "create", "localhost:8000", "acme", "conf"], &temp);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("organizers_acme_events_conf.yml"), "stderr: {stderr}");
}

#[test]
fn create_with_malformed_document_fails() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(temp.path().join("event.yml"), "event: [unclosed\n").unwrap();
    let output = steamroll(
        &["event", "create", "localhost:8000", "acme", "conf", "--file", "event.yml"],
        &temp,
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse"));
}

#[test]
fn fetch_without_credentials_fails() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(temp.path().join("auth.yml"), "").unwrap();
    let output = steamroll(
        &["event", "fetch", "localhost:8000", "acme", "conf", "--keep-defaults"],
        &temp,
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No credentials configured for http://localhost:8000"));
    assert!(!temp.path().join("organizers_acme_events_conf.yml").exists());
}

#[test]
fn fetch_requires_defaults_unless_kept() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp.path().join("auth.yml"),
        "http://localhost:8000:\n  Authorization: Token x\n",
    )
    .unwrap();
    let output = steamroll(&["event", "fetch", "localhost:8000", "acme", "conf"], &temp);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("defaults.yml"));
}
