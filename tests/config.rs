use std::fs;
use std::path::PathBuf;

use anyhow::bail;
use kira_boldqc::config::{RunConfig, check_input_file, check_subject_id, resolve_inputs};
use kira_boldqc::ctx::ArtifactPaths;
use tempfile::TempDir;

#[test]
fn out_dir_is_subject_qc() {
    let config = RunConfig::new(
        PathBuf::from("bold.nii.gz"),
        PathBuf::from("mask.nii.gz"),
        "sub01".to_string(),
        PathBuf::from("/results"),
    );
    assert_eq!(config.out_dir(), PathBuf::from("/results/sub01_qc"));
    let paths = ArtifactPaths::new(config.out_dir(), &config.subject);
    assert_eq!(paths.staged, PathBuf::from("/results/sub01_qc/sub01_func.nii.gz"));
    assert_eq!(paths.mc_base, PathBuf::from("/results/sub01_qc/sub01_mc"));
    assert_eq!(
        paths.report_html,
        PathBuf::from("/results/sub01_qc/sub01_qc_report.html")
    );
    assert!(!paths.regenerated_files().contains(&&paths.log));
}

#[test]
fn prompts_only_for_missing_inputs() {
    let mut asked = Vec::new();
    let (scan, mask, subject) = resolve_inputs(
        Some(PathBuf::from("bold.nii.gz")),
        None,
        None,
        |label| {
            asked.push(label.to_string());
            Ok(format!("  answer-{}  \n", asked.len()))
        },
    )
    .unwrap();
    assert_eq!(scan, PathBuf::from("bold.nii.gz"));
    assert_eq!(mask, PathBuf::from("answer-1"));
    assert_eq!(subject, "answer-2");
    assert_eq!(asked, vec!["Path to brain mask", "Subject identifier"]);
}

#[test]
fn prompt_errors_propagate() {
    let res = resolve_inputs(None, None, None, |label| bail!("{} refused", label));
    assert!(res.unwrap_err().to_string().contains("functional scan"));
}

#[test]
fn input_file_checks() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("bold.nii.gz");
    fs::write(&file, b"x").unwrap();
    assert!(check_input_file(&file, "functional scan").is_ok());

    let err = check_input_file(tmp.path(), "brain mask").unwrap_err();
    assert!(err.to_string().contains("brain mask is not a regular file"));
    let err = check_input_file(&tmp.path().join("no"), "brain mask").unwrap_err();
    assert!(err.to_string().contains("brain mask not found"));
}

#[test]
fn subject_id_checks() {
    assert!(check_subject_id("sub-01").is_ok());
    assert!(check_subject_id("").is_err());
    assert!(check_subject_id("   ").is_err());
    assert!(check_subject_id("a/b").is_err());
    assert!(check_subject_id("a\\b").is_err());
    assert!(check_subject_id("..").is_err());
    assert!(check_subject_id(".").is_err());
    assert!(check_subject_id("sub..01").is_ok());
    assert!(check_subject_id("sub.01").is_ok());
}
