//! tubely-ingest: run one local MP4 through the ingestion pipeline.
//!
//! Storage, tool paths and limits come from the environment or a `.env` file.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tubely_core::constants::VIDEO_CONTENT_TYPE;
use tubely_core::{Config, OwnerContext};
use tubely_infra::{init_telemetry, shutdown_telemetry, TelemetryConfig};
use tubely_processing::{UploadValidator, VideoIngestor};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tubely-ingest", about = "Probe, fast-start remux and upload a video")]
struct Cli {
    /// Path to the video file
    file: PathBuf,
    /// Declared content type of the file
    #[arg(long, default_value = VIDEO_CONTENT_TYPE)]
    content_type: String,
    /// Uploading user, recorded in logs
    #[arg(long)]
    user_id: Option<Uuid>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    init_telemetry(&TelemetryConfig::from_config("tubely-ingest", &config))?;

    let result = run(cli, &config).await;
    shutdown_telemetry().await;
    result
}

async fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let size = tokio::fs::metadata(&cli.file)
        .await
        .with_context(|| format!("Failed to read {}", cli.file.display()))?
        .len();
    let size = usize::try_from(size).context("File size does not fit in memory")?;

    UploadValidator::mp4(config.max_video_upload_size_bytes())
        .validate_all(&cli.content_type, size)?;

    let data = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    let storage = tubely_storage::create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    let owner = OwnerContext::new(cli.user_id.unwrap_or_else(Uuid::nil));
    let ingestor = VideoIngestor::from_config(storage, config);
    let url = ingestor.ingest(&data, &owner).await?;

    if cli.json {
        println!("{}", serde_json::json!({ "url": url }));
    } else {
        println!("{}", url);
    }
    Ok(())
}
