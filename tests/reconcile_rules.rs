use docx_mill::reconcile::{reconcile, ConversionOutcome};
use docx_mill::supervise::CapturedExecution;
use std::fs;
use std::path::Path;

fn exec(exit_code: Option<i32>, timed_out: bool, stdout: &str, stderr: &str) -> CapturedExecution {
    CapturedExecution {
        exit_code,
        timed_out,
        stdout: stdout.into(),
        stderr: stderr.into(),
    }
}

#[test]
fn timeout_wins_over_everything() {
    let out = reconcile(&exec(None, true, "", ""), Path::new("/tmp/never-made.docx"));
    assert!(!out.success);
    assert!(out.error.contains("timeout"));
}

#[test]
fn nonzero_exit_dominates_even_with_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("report.docx");
    fs::write(&artifact, vec![0u8; 2048]).unwrap();

    let out = reconcile(&exec(Some(1), false, "half a payload", "parse error"), &artifact);
    assert!(!out.success);
    assert!(out.error.contains("exit code 1"));
    assert!(out.error.contains("parse error"));
    assert!(out.error.contains("half a payload"));
}

#[test]
fn well_formed_payload_passes_through_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("report.docx");
    fs::write(&artifact, b"docx bytes").unwrap();

    let payload = ConversionOutcome {
        success: true,
        output_path: artifact.display().to_string(),
        file_size: 4096,
        message: "ok".into(),
        error: String::new(),
    };
    let stdout = serde_json::to_string(&payload).unwrap();

    let out = reconcile(&exec(Some(0), false, &stdout, ""), &artifact);
    assert_eq!(out, payload);
}

#[test]
fn garbage_stdout_with_artifact_degrades_to_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("report.docx");
    fs::write(&artifact, vec![0u8; 2048]).unwrap();

    let out = reconcile(&exec(Some(0), false, "garbage not json", ""), &artifact);
    assert!(out.success);
    assert_eq!(out.file_size, 2048);
    assert_eq!(out.output_path, artifact.display().to_string());
    assert!(out.message.contains("output file created"));
}

#[test]
fn garbage_stdout_without_artifact_fails_with_raw_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("report.docx");

    let out = reconcile(&exec(Some(0), false, "garbage not json", ""), &missing);
    assert!(!out.success);
    assert!(out.error.contains("garbage not json"));
}

#[test]
fn stale_payload_size_is_ignored_in_filesystem_fallback() {
    // Payload missing the required success field is malformed; size must be
    // re-read from disk, not taken from the stale field.
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("report.docx");
    fs::write(&artifact, vec![0u8; 512]).unwrap();

    let stdout = r#"{"file_size": 999999, "output_path": "elsewhere.docx"}"#;
    let out = reconcile(&exec(Some(0), false, stdout, ""), &artifact);
    assert!(out.success);
    assert_eq!(out.file_size, 512);
}

#[test]
fn success_payload_with_missing_file_is_not_trusted() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("report.docx");

    let stdout = format!(
        r#"{{"success":true,"output_path":"{}","file_size":4096,"message":"ok","error":""}}"#,
        missing.display()
    );
    let out = reconcile(&exec(Some(0), false, &stdout, ""), &missing);
    assert!(!out.success);
}

#[test]
fn worker_declared_failure_keeps_error_detail() {
    let stdout =
        r#"{"success":false,"output_path":"","file_size":0,"message":"","error":"bad page tree"}"#;
    let out = reconcile(&exec(Some(0), false, stdout, ""), Path::new("/tmp/x.docx"));
    assert!(!out.success);
    assert_eq!(out.error, "bad page tree");
}

#[test]
fn worker_declared_failure_without_detail_gets_one() {
    let stdout =
        r#"{"success":false,"output_path":"","file_size":0,"message":"","error":""}"#;
    let out = reconcile(&exec(Some(0), false, stdout, ""), Path::new("/tmp/x.docx"));
    assert!(!out.success);
    assert!(!out.error.is_empty());
}
