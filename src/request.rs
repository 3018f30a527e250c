use crate::{config::Config, error::ConvertError};
use anyhow::Context;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A validated conversion request with its derived output path. Immutable
/// once constructed; the same input always maps to the same output path.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output_path: PathBuf,
}

impl ConversionRequest {
    /// Validate the input and fix the output path. An existing file at the
    /// output path is overwritten by the worker; that is not checked here.
    pub fn new(cfg: &Config, input: &Path, out_dir: Option<&Path>) -> Result<Self, ConvertError> {
        let input_disp = input.display().to_string();

        if cfg.security.reject_url_inputs && looks_like_url(&input_disp) {
            return Err(ConvertError::Unexpected(anyhow::anyhow!(
                "URL inputs are disabled: {input_disp}"
            )));
        }

        if !input.exists() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }

        // Open it once so a permission problem surfaces as a precise error
        // here instead of an opaque worker-side failure later.
        File::open(input)
            .with_context(|| format!("opening input: {input_disp}"))
            .map_err(ConvertError::Unexpected)?;

        match input.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => {}
            _ => warn!("input does not look like a PDF: {}", input_disp),
        }

        // The worker contract passes absolute paths only.
        let input = input
            .canonicalize()
            .with_context(|| format!("canonicalize input: {input_disp}"))
            .map_err(ConvertError::Unexpected)?;

        let dir = match out_dir {
            Some(d) => d
                .canonicalize()
                .with_context(|| format!("canonicalize output dir: {}", d.display()))
                .map_err(ConvertError::Unexpected)?,
            None => input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let output_path = dir.join(format!("{stem}.{}", cfg.convert.output_extension));

        Ok(Self { input, output_path })
    }
}

fn looks_like_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("file://")
}
