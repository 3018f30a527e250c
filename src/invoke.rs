use crate::{error::ConvertError, locate::ResolvedRuntime, request::ConversionRequest};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything needed to start one worker process. Pure data; building a spec
/// has no side effect beyond reading the script's metadata. Arguments are
/// passed as separate argv entries, so paths with spaces need no quoting.
#[derive(Debug, Clone)]
pub struct InvocationSpec {
    pub runtime: PathBuf,
    pub script: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub timeout: Duration,
}

impl InvocationSpec {
    /// The script check happens here, before any spawn, so a missing script
    /// surfaces as a precise error instead of a generic spawn failure.
    pub fn build(
        request: &ConversionRequest,
        runtime: &ResolvedRuntime,
        script: &Path,
        timeout: Duration,
    ) -> Result<Self, ConvertError> {
        if !script.exists() {
            return Err(ConvertError::ScriptMissing(script.to_path_buf()));
        }
        Ok(Self {
            runtime: runtime.exe.clone(),
            script: script.to_path_buf(),
            input: request.input.clone(),
            output: request.output_path.clone(),
            timeout,
        })
    }

    /// Argument vector handed to the runtime: script, input, output.
    pub fn args(&self) -> [&Path; 3] {
        [
            self.script.as_path(),
            self.input.as_path(),
            self.output.as_path(),
        ]
    }
}
