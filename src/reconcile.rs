use crate::error::ConvertError;
use crate::supervise::CapturedExecution;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// The one authoritative answer for a conversion. This is also exactly the
/// payload shape the worker prints on stdout, so a well-formed worker report
/// can pass through verbatim. `success` carries no serde default: a payload
/// without it is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub success: bool,
    #[serde(default)]
    pub output_path: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: String,
}

impl ConversionOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output_path: String::new(),
            file_size: 0,
            message: String::new(),
            error: error.into(),
        }
    }
}

/// Turn raw exit state, optional structured payload, and filesystem truth
/// into one outcome. Exit code is authoritative for hard failure; the
/// payload is the preferred success channel; the filesystem is the fallback
/// oracle when the payload channel is unreliable (a worker that writes
/// diagnostics to stdout ahead of or instead of its JSON).
pub fn reconcile(exec: &CapturedExecution, expected_output: &Path) -> ConversionOutcome {
    if exec.timed_out {
        return ConversionOutcome::failure(ConvertError::Timeout.to_string());
    }

    let code = exec.exit_code.unwrap_or(-1);
    if code != 0 {
        return ConversionOutcome::failure(
            ConvertError::NonZeroExit {
                code,
                stderr: exec.stderr.clone(),
                stdout: exec.stdout.clone(),
            }
            .to_string(),
        );
    }

    match serde_json::from_str::<ConversionOutcome>(exec.stdout.trim()) {
        Ok(payload) if payload.success => {
            // Never trust the payload alone: the file has to be there now.
            if Path::new(&payload.output_path).exists() {
                payload
            } else {
                warn!(
                    "worker reported success but {} does not exist",
                    payload.output_path
                );
                from_filesystem(
                    expected_output,
                    "worker payload pointed at a missing file",
                    &exec.stdout,
                )
            }
        }
        Ok(mut payload) => {
            // Worker-declared failure with exit 0. Keep it, but a failure
            // outcome must carry an error string.
            if payload.error.is_empty() {
                payload.error = if payload.message.is_empty() {
                    "worker reported failure without detail".to_string()
                } else {
                    payload.message.clone()
                };
            }
            payload
        }
        Err(err) => {
            debug!("worker stdout is not a payload: {err}");
            from_filesystem(expected_output, &err.to_string(), &exec.stdout)
        }
    }
}

/// Payload channel unusable; the artifact decides. Size comes fresh from the
/// filesystem, never from a stale payload field.
fn from_filesystem(expected_output: &Path, detail: &str, stdout: &str) -> ConversionOutcome {
    match std::fs::metadata(expected_output) {
        Ok(meta) => ConversionOutcome {
            success: true,
            output_path: expected_output.display().to_string(),
            file_size: meta.len(),
            message: format!("conversion completed (payload unreadable but output file created: {detail})"),
            error: String::new(),
        },
        Err(_) => ConversionOutcome::failure(
            ConvertError::PayloadUnparseable {
                detail: detail.to_string(),
                stdout: stdout.to_string(),
            }
            .to_string(),
        ),
    }
}
