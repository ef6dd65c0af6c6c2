use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

fn write_inputs(dir: &std::path::Path) {
    fs::write(dir.join("bold.nii.gz"), b"bold").unwrap();
    fs::write(dir.join("mask.nii.gz"), b"mask").unwrap();
}

#[test]
fn validate_command_ok() {
    let tmp = TempDir::new().unwrap();
    write_inputs(tmp.path());

    let mut cmd = Command::cargo_bin("kira-boldqc").unwrap();
    cmd.arg("validate")
        .arg("--scan")
        .arg(tmp.path().join("bold.nii.gz"))
        .arg("--mask")
        .arg(tmp.path().join("mask.nii.gz"))
        .arg("--subject")
        .arg("sub01");
    cmd.assert().success();
}

#[test]
fn validate_command_missing_scan() {
    let tmp = TempDir::new().unwrap();
    write_inputs(tmp.path());

    let mut cmd = Command::cargo_bin("kira-boldqc").unwrap();
    let out = cmd
        .arg("validate")
        .arg("--scan")
        .arg(tmp.path().join("absent.nii.gz"))
        .arg("--mask")
        .arg(tmp.path().join("mask.nii.gz"))
        .arg("--subject")
        .arg("sub01")
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("functional scan not found"));
}

#[test]
fn validate_command_rejects_path_like_subject() {
    let tmp = TempDir::new().unwrap();
    write_inputs(tmp.path());

    let mut cmd = Command::cargo_bin("kira-boldqc").unwrap();
    cmd.arg("validate")
        .arg("--scan")
        .arg(tmp.path().join("bold.nii.gz"))
        .arg("--mask")
        .arg(tmp.path().join("mask.nii.gz"))
        .arg("--subject")
        .arg("../escape");
    cmd.assert().failure();
}

#[test]
fn run_without_prompt_fails_on_missing_input() {
    let tmp = TempDir::new().unwrap();
    write_inputs(tmp.path());

    let mut cmd = Command::cargo_bin("kira-boldqc").unwrap();
    cmd.arg("run")
        .arg("--no-prompt")
        .arg("--scan")
        .arg(tmp.path().join("bold.nii.gz"))
        .arg("--subject")
        .arg("sub01")
        .arg("--out")
        .arg(tmp.path());
    cmd.assert().failure();
    assert!(!tmp.path().join("sub01_qc").exists());
}

#[test]
fn run_with_missing_mask_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    write_inputs(tmp.path());

    let mut cmd = Command::cargo_bin("kira-boldqc").unwrap();
    cmd.arg("run")
        .arg("--no-prompt")
        .arg("--scan")
        .arg(tmp.path().join("bold.nii.gz"))
        .arg("--mask")
        .arg(tmp.path().join("nope.nii.gz"))
        .arg("--subject")
        .arg("sub01")
        .arg("--out")
        .arg(tmp.path());
    cmd.assert().failure();
    assert!(!tmp.path().join("sub01_qc").exists());
}

#[test]
fn report_command_without_previous_run_fails() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("kira-boldqc").unwrap();
    cmd.arg("report")
        .arg("--out")
        .arg(tmp.path())
        .arg("--subject")
        .arg("sub01");
    cmd.assert().failure();
}
