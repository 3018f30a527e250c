use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub runtime: Runtime,
    #[serde(default)]
    pub convert: Convert,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
    #[serde(default)]
    pub security: Security,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: Default::default(),
            paths: Default::default(),
            runtime: Default::default(),
            convert: Default::default(),
            logging: Default::default(),
            debug: Default::default(),
            security: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub scripts_dir: String,
    pub worker_script: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            scripts_dir: "scripts".into(),
            worker_script: "pdf2docx_runner.py".into(),
        }
    }
}

/// Candidate order is priority order: bare command names first, then
/// version-pinned install paths, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runtime {
    pub candidates: Vec<String>,
    pub probe_arg: String,
    pub probe_timeout_seconds: u64,
}
impl Default for Runtime {
    fn default() -> Self {
        Self {
            candidates: vec![
                "python3".into(),
                "python".into(),
                "/usr/local/bin/python3.13".into(),
                "/usr/local/bin/python3.12".into(),
                "/usr/local/bin/python3.11".into(),
                "/usr/local/bin/python3.10".into(),
                "/usr/local/bin/python3.9".into(),
                "/usr/local/bin/python3.8".into(),
                "/usr/bin/python3".into(),
            ],
            probe_arg: "--version".into(),
            probe_timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Convert {
    pub timeout_seconds: u64,
    pub output_extension: String,
}
impl Default for Convert {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            output_extension: "docx".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debug {
    pub keep_worker_stderr: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            keep_worker_stderr: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    pub reject_url_inputs: bool,
    pub pin_scripts_dir: bool,
}
impl Default for Security {
    fn default() -> Self {
        Self {
            reject_url_inputs: true,
            pin_scripts_dir: true,
        }
    }
}
