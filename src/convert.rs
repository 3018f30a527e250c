use crate::{
    config::Config,
    error::ConvertError,
    invoke::InvocationSpec,
    locate::{self, ResolvedRuntime},
    reconcile::{self, ConversionOutcome},
    request::ConversionRequest,
    supervise,
};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Expected location of the conversion worker script.
pub fn worker_script_path(cfg: &Config) -> PathBuf {
    PathBuf::from(&cfg.paths.scripts_dir).join(&cfg.paths.worker_script)
}

/// One run's conversion context: config plus the runtime resolved once up
/// front and injected into every call. A `Converter` holds no mutable state,
/// so it can serve any number of concurrent conversions; each gets its own
/// subprocess and buffers.
#[derive(Debug)]
pub struct Converter {
    cfg: Config,
    runtime: ResolvedRuntime,
    script: PathBuf,
}

impl Converter {
    /// Resolve the worker script and a usable runtime. Both are terminal
    /// when missing; neither changes mid-run, so there is no retry.
    pub fn new(cfg: &Config) -> Result<Self> {
        if cfg.security.pin_scripts_dir {
            let cwd = std::env::current_dir().with_context(|| "current_dir")?;
            let canon = PathBuf::from(&cfg.paths.scripts_dir)
                .canonicalize()
                .with_context(|| format!("canonicalize scripts_dir: {}", cfg.paths.scripts_dir))?;
            if !canon.starts_with(&cwd) {
                return Err(anyhow!(
                    "scripts_dir is outside cwd while pin_scripts_dir=true: {}",
                    canon.display()
                ));
            }
        }

        let script = worker_script_path(cfg);
        if !script.exists() {
            return Err(ConvertError::ScriptMissing(script).into());
        }

        let runtime = locate::locate(cfg)?;
        info!("runtime resolved: {}", runtime.exe.display());

        Ok(Self {
            cfg: cfg.clone(),
            runtime,
            script,
        })
    }

    pub fn runtime(&self) -> &ResolvedRuntime {
        &self.runtime
    }

    /// Convert one PDF. Synchronous; callers that must stay responsive run
    /// it on their own worker thread. Every failure comes back as a
    /// `success = false` outcome with a descriptive error string, never as a
    /// raw fault.
    pub fn convert(&self, input: &Path, out_dir: Option<&Path>) -> ConversionOutcome {
        match self.try_convert(input, out_dir) {
            Ok(outcome) => outcome,
            Err(err) => ConversionOutcome::failure(err.to_string()),
        }
    }

    fn try_convert(
        &self,
        input: &Path,
        out_dir: Option<&Path>,
    ) -> Result<ConversionOutcome, ConvertError> {
        let request = ConversionRequest::new(&self.cfg, input, out_dir)?;
        let spec = InvocationSpec::build(
            &request,
            &self.runtime,
            &self.script,
            Duration::from_secs(self.cfg.convert.timeout_seconds),
        )?;

        info!(
            "convert {} -> {}",
            request.input.display(),
            request.output_path.display()
        );

        let captured = supervise::run(&spec).map_err(ConvertError::Unexpected)?;

        if self.cfg.debug.keep_worker_stderr && !captured.stderr.is_empty() {
            debug!("worker stderr: {}", captured.stderr.trim());
        }

        Ok(reconcile::reconcile(&captured, &request.output_path))
    }
}
