//! Helpers shared by the `resizer` binary.

use anyhow::{Context, Result};
use resizer_api_client::ResizeParams;
use resizer_core::FitMode;
use std::path::{Path, PathBuf};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// clap value parser for `--fit`.
pub fn parse_fit(s: &str) -> Result<FitMode, String> {
    FitMode::parse(s).ok_or_else(|| {
        let names: Vec<&str> = FitMode::ALL.iter().map(|f| f.as_str()).collect();
        format!("invalid fit '{}', expected one of: {}", s, names.join(", "))
    })
}

/// `<stem>_<w>x<h>_<fit>.jpg` next to the input. Unset sides are left empty.
pub fn default_output_path(input: &Path, params: &ResizeParams) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let side = |v: Option<u32>| v.map(|v| v.to_string()).unwrap_or_default();
    let name = format!(
        "{}_{}x{}_{}.jpg",
        stem,
        side(params.width),
        side(params.height),
        params.fit.unwrap_or_default()
    );
    input.with_file_name(name)
}

/// Read the input image and return it with its file name.
pub fn read_input(path: &Path) -> Result<(Vec<u8>, String)> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    if data.is_empty() {
        anyhow::bail!("{} is empty", path.display());
    }
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image.jpg")
        .to_string();
    Ok((data, filename))
}

pub fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data)
        .with_context(|| format!("Failed to write output: {}", path.display()))
}
