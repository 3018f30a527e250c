use crate::{
    config::Config,
    convert::{worker_script_path, Converter},
    locate,
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "docx-mill")]
#[command(about = "PDF to DOCX conversion orchestrator (python worker + timeout supervision)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./docx-mill.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that a worker runtime and the conversion script are available.
    Doctor {},
    /// Convert one PDF to DOCX.
    Convert {
        #[arg(long)]
        input: PathBuf,
        /// Output directory; defaults to the input's directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Doctor {} => doctor(&cfg),
        Command::Convert { input, out_dir } => convert(&cfg, input, out_dir.as_deref()),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("docx-mill.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("docx-mill.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = if let Some(path) = resolve_log_path(cfg) {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(&path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from("docx-mill.log"))
}

/// What `doctor` prints: which runtime answered the health probe and whether
/// the worker script is where the config says it is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeDiag {
    pub runtime_exe: Option<String>,
    pub worker_script: String,
    pub script_present: bool,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn doctor(cfg: &Config) -> Result<()> {
    let script = worker_script_path(cfg);
    let script_present = script.exists();

    let (runtime_exe, error) = match locate::locate(cfg) {
        Ok(rt) => (Some(rt.exe.display().to_string()), None),
        Err(err) => (None, Some(err.to_string())),
    };

    let ok = script_present && runtime_exe.is_some();
    let diag = RuntimeDiag {
        runtime_exe,
        worker_script: script.display().to_string(),
        script_present,
        ok,
        error,
    };

    println!("{}", serde_json::to_string_pretty(&diag)?);

    if !ok {
        return Err(anyhow!("doctor found problems"));
    }
    Ok(())
}

fn convert(cfg: &Config, input: &Path, out_dir: Option<&Path>) -> Result<()> {
    let started = now_rfc3339();
    let converter = Converter::new(cfg)?;
    let outcome = converter.convert(input, out_dir);

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if cfg.global.print_summary {
        let status = if outcome.success { "ok" } else { "failed" };
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "input": input,
                "started": started,
                "finished": now_rfc3339(),
                "status": status,
            }))?
        );
    }

    if !outcome.success {
        return Err(anyhow!("conversion failed: {}", outcome.error));
    }
    Ok(())
}
