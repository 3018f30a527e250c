use crate::{config::Config, error::ConvertError};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// A worker runtime that passed its health probe. Resolved once per
/// `Converter` and shared read-only by every conversion it runs.
#[derive(Debug, Clone)]
pub struct ResolvedRuntime {
    pub exe: PathBuf,
}

/// Try each candidate in list order and keep the first one whose probe exits
/// 0 inside the probe timeout. List order is priority order: it decides which
/// installed version wins when several are present.
pub fn locate(cfg: &Config) -> Result<ResolvedRuntime, ConvertError> {
    let timeout = Duration::from_secs(cfg.runtime.probe_timeout_seconds);
    for candidate in &cfg.runtime.candidates {
        if probe_candidate(candidate, &cfg.runtime.probe_arg, timeout) {
            debug!("selected runtime: {candidate}");
            return Ok(ResolvedRuntime {
                exe: PathBuf::from(candidate),
            });
        }
    }
    Err(ConvertError::RuntimeNotFound)
}

/// A candidate is usable iff it spawns and exits 0 within the timeout.
/// Everything else (not found, permission denied, bad exit, hang) means
/// "unavailable" and the search moves on; per-candidate errors never surface.
fn probe_candidate(exe: &str, probe_arg: &str, timeout: Duration) -> bool {
    let child = Command::new(exe)
        .arg(probe_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match child {
        Ok(c) => c,
        Err(err) => {
            debug!("candidate {exe} did not spawn: {err}");
            return false;
        }
    };

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return status.success(),
            Ok(None) => {}
            Err(err) => {
                debug!("candidate {exe} wait failed: {err}");
                return false;
            }
        }

        if start.elapsed() > timeout {
            debug!("candidate {exe} probe timed out after {timeout:?}");
            let _ = child.kill();
            let _ = child.wait();
            return false;
        }

        std::thread::sleep(Duration::from_millis(25));
    }
}
