// CLI integration: every subcommand against a snapshot in a temp directory

use assert_cmd::Command;
use predicates::prelude::*;
use refurb_tracker::AppState;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn refurb(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("refurb-tracker").unwrap();
    cmd.current_dir(dir).env("RUST_LOG", "off");
    cmd
}

fn state_at(dir: &Path) -> AppState {
    let raw = std::fs::read_to_string(dir.join(".refurb-tracker/state.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], "1.0.0");
    serde_json::from_value(value["state"].clone()).unwrap()
}

#[test]
fn test_no_subcommand_shows_guidance() {
    let dir = TempDir::new().unwrap();
    refurb(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("refurb-tracker init"));
}

#[test]
fn test_commands_require_a_snapshot() {
    let dir = TempDir::new().unwrap();
    refurb(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("refurb-tracker init"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    refurb(dir.path()).arg("init").assert().success();
    refurb(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    refurb(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn test_device_walks_the_workflow() {
    let dir = TempDir::new().unwrap();
    refurb(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("tech-1"));

    refurb(dir.path())
        .args([
            "order",
            "--client",
            "client-1",
            "--device",
            "Apple,iPhone 12,356938035643809,Cracked screen",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Order"));

    let device_id = state_at(dir.path()).devices[0].id.to_string();

    refurb(dir.path())
        .args(["route", &device_id, "--staff", "enterprise-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pending → qc"));

    refurb(dir.path())
        .args([
            "review", &device_id, "--stage", "qc", "--reviewer", "enterprise-1", "--verdict", "reject",
            "--notes", "Touch dead",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("qc → technician"))
        .stdout(predicate::str::contains("technician manager: assign"));

    refurb(dir.path())
        .args(["assign", &device_id, "--technician", "tech-1", "--manager", "enterprise-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tech-1"));

    // clearance cannot act on a device at the bench
    refurb(dir.path())
        .args([
            "review", &device_id, "--stage", "clearance", "--reviewer", "enterprise-1", "--verdict",
            "approve",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid transition"));

    refurb(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Touch dead"));

    refurb(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("tech-1 (Sam Ortega): 1 assigned"));

    refurb(dir.path())
        .args(["history", "--reviewer", "admin-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No review records"));

    refurb(dir.path())
        .args(["status", "--client", "client-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{device_id} Apple iPhone 12")));

    let state = state_at(dir.path());
    assert_eq!(state.reviews.len(), 1);
    assert_eq!(state.devices[0].technician_notes, vec![""]);
}

#[test]
fn test_bad_imei_is_reported() {
    let dir = TempDir::new().unwrap();
    refurb(dir.path()).arg("init").assert().success();
    refurb(dir.path())
        .args(["order", "--client", "client-1", "--device", "Apple,iPhone 12,123,Screen"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("devices[0].imei"));
    assert!(state_at(dir.path()).devices.is_empty());
}

#[test]
fn test_state_file_flag_overrides_config() {
    let dir = TempDir::new().unwrap();
    refurb(dir.path())
        .args(["init", "--state-file", "custom/snap.json"])
        .assert()
        .success();
    assert!(dir.path().join("custom/snap.json").exists());
    assert!(!dir.path().join(".refurb-tracker/state.json").exists());
}
