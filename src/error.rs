use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of a single conversion. Every variant renders into the
/// error string carried by a failed `ConversionOutcome`; none of them escape
/// `Converter::convert` as a raw error.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("no usable python runtime found; install Python 3.8+ or adjust [runtime] candidates")]
    RuntimeNotFound,

    #[error("worker script not found: {0}")]
    ScriptMissing(PathBuf),

    #[error("conversion timeout - worker took too long")]
    Timeout,

    #[error("worker failed with exit code {code}\nstderr: {stderr}\nstdout: {stdout}")]
    NonZeroExit {
        code: i32,
        stderr: String,
        stdout: String,
    },

    #[error("failed to parse worker payload: {detail}\nraw stdout: {stdout}")]
    PayloadUnparseable { detail: String, stdout: String },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}
