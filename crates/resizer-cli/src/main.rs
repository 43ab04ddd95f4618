//! resizer CLI: resize local images through the resizer API.
//!
//! The server is taken from `--server`, else RESIZER_API_URL (or API_URL).

use anyhow::Context;
use clap::{Parser, Subcommand};
use resizer_api_client::{ResizeParams, ResizerClient};
use resizer_cli::{default_output_path, init_tracing, parse_fit, read_input, write_output};
use resizer_core::FitMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resizer", about = "Resize images through the resizer API")]
struct Cli {
    /// Base URL of the resizer API
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize an image file to JPEG
    Resize {
        /// Path to the image
        file: PathBuf,
        /// Target width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Target height in pixels
        #[arg(long)]
        height: Option<u32>,
        /// JPEG quality (1-100)
        #[arg(long)]
        quality: Option<u8>,
        /// cover, contain, fill, inside or outside
        #[arg(long, value_parser = parse_fit)]
        fit: Option<FitMode>,
        /// Output path (default: <stem>_<w>x<h>_<fit>.jpg next to the input)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Request a presigned upload authorization and print it
    UploadUrl {
        /// File extension for the object key
        #[arg(long)]
        ext: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = match cli.server {
        Some(url) => ResizerClient::new(url),
        None => ResizerClient::from_env(),
    }
    .context("Failed to create API client")?;

    match cli.command {
        Commands::Resize {
            file,
            width,
            height,
            quality,
            fit,
            out,
        } => {
            let params = ResizeParams {
                width,
                height,
                quality,
                fit,
            };
            let (data, filename) = read_input(&file)?;
            let output = client.resize_bytes(data, &filename, &params).await?;

            let out = out.unwrap_or_else(|| default_output_path(&file, &params));
            write_output(&out, &output)?;
            println!(
                "{}",
                serde_json::json!({ "output": out.display().to_string(), "bytes": output.len() })
            );
        }
        Commands::UploadUrl { ext } => {
            let response = client.request_upload_url(ext.as_deref()).await?;
            let out = serde_json::to_string_pretty(&response).context("Serialize response")?;
            println!("{}", out);
        }
    }

    Ok(())
}
