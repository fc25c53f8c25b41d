//! End-to-end runs of the `morph-replay` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;

fn scenario(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

fn reports(output: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn status(report: &Value) -> &str {
    report["value"]["status"].as_str().unwrap_or_default()
}

#[test]
fn test_epoch_rotation_scenario() {
    let output = Command::cargo_bin("morph-replay")
        .unwrap()
        .arg(scenario("epoch-rotation.toml"))
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports = reports(&output.stdout);
    assert_eq!(reports.len(), 28);

    assert_eq!(status(&reports[0]), "notified");
    assert_eq!(reports[0]["notifications"][0]["event"], "add_peer");
    assert_eq!(status(&reports[4]), "executed");
    assert_eq!(status(&reports[7]), "executed");

    assert_eq!(status(&reports[9]), "pending");
    assert_eq!(status(&reports[10]), "executed");
    assert_eq!(reports[10]["notifications"][0]["event"], "new_epoch");
    assert_eq!(reports[11]["value"].as_array().unwrap().len(), 2);

    assert_eq!(status(&reports[12]), "rejected");
    assert_eq!(reports[12]["value"]["reason"]["kind"], "stale_epoch");
    assert_eq!(reports[12]["writes"], 0);

    assert_eq!(status(&reports[15]), "executed");
    assert_eq!(status(&reports[18]), "executed");
    assert_eq!(reports[19]["value"].as_array().unwrap().len(), 1);
    assert_eq!(reports[20]["value"].as_array().unwrap().len(), 2);

    assert_eq!(status(&reports[23]), "executed");
    assert_eq!(reports[23]["notifications"][0]["event"], "set_config");
    let config = reports[24]["value"].as_array().unwrap();
    assert_eq!(config.len(), 2);
    assert_eq!(config[0]["value"], hex::encode("360"));

    assert_eq!(status(&reports[27]), "executed");
    assert!(reports.iter().all(|report| report.get("error").is_none()));
}

#[test]
fn test_settings_file_is_accepted() {
    Command::cargo_bin("morph-replay")
        .unwrap()
        .arg("--config")
        .arg(scenario("morph.toml"))
        .arg("--pretty")
        .arg(scenario("epoch-rotation.toml"))
        .env("RUST_LOG", "off")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"executed\""));
}

#[test]
fn test_missing_scenario_fails() {
    Command::cargo_bin("morph-replay")
        .unwrap()
        .arg("/definitely/not/here.toml")
        .env("RUST_LOG", "off")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read scenario"));
}

#[test]
fn test_failed_step_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("outsider.toml");
    let ring = format!("02{}", "11".repeat(32));
    let outsider = format!("03{}", "99".repeat(32));
    std::fs::write(
        &path,
        format!(
            "[deploy]\ninner_ring = [\"{ring}\"]\n\n\
             [[step]]\nheight = 1\nsigners = [\"{outsider}\"]\nop = \"new_epoch\"\nepoch = 1\n\n\
             [[step]]\nheight = 2\nop = \"epoch\"\n"
        ),
    )
    .unwrap();

    let output = Command::cargo_bin("morph-replay")
        .unwrap()
        .arg(&path)
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports = reports(&output.stdout);
    assert_eq!(
        reports[0]["error"],
        "newEpoch: invoked by non inner ring node"
    );
    assert_eq!(reports[1]["value"], 0);
}
