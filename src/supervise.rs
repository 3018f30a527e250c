use crate::invoke::InvocationSpec;
use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Raw result of one worker run. `exit_code` is `None` exactly when
/// `timed_out` is set; interpreting either is the reconciler's job.
#[derive(Debug, Clone)]
pub struct CapturedExecution {
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run the worker to completion or timeout, draining stdout and stderr the
/// whole time. Each stream gets its own reader thread so a worker that
/// writes more than a pipe buffer before exiting can't deadlock against a
/// supervisor that is only watching for exit.
pub fn run(spec: &InvocationSpec) -> Result<CapturedExecution> {
    debug!(
        "worker run {} timeout={:?}",
        spec.script.display(),
        spec.timeout
    );

    let mut cmd = Command::new(&spec.runtime);
    for arg in spec.args() {
        cmd.arg(arg);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning worker: {}", spec.runtime.display()))?;

    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf).with_context(|| "read stdout")?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf).with_context(|| "read stderr")?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            let stdout = join_reader(stdout_thread, "stdout")?;
            let stderr = join_reader(stderr_thread, "stderr")?;
            return Ok(CapturedExecution {
                exit_code: Some(status.code().unwrap_or(-1)),
                timed_out: false,
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }

        if start.elapsed() > spec.timeout {
            warn!("worker exceeded timeout ({:?}); killing", spec.timeout);
            // Forcible kill, no cooperative signal first. The wait below
            // confirms the child is actually gone and closes its pipes.
            let _ = child.kill();
            child.wait().with_context(|| "wait after kill")?;
            let stdout = join_reader(stdout_thread, "stdout")?;
            let stderr = join_reader(stderr_thread, "stderr")?;
            return Ok(CapturedExecution {
                exit_code: None,
                timed_out: true,
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}

fn join_reader(handle: JoinHandle<Result<Vec<u8>>>, name: &str) -> Result<Vec<u8>> {
    handle
        .join()
        .map_err(|_| anyhow!("{name} reader thread panicked"))?
}
