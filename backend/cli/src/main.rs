mod recognize_cmd;
mod status_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use snapstory_config::{apply_env_overrides, config_dir, config_file_path, ensure_valid, load_config};

#[derive(Parser)]
#[command(name = "snapstory")]
#[command(about = "SnapStory: photo in, bilingual children's story out")]
#[command(version)]
struct Cli {
    /// Path to the YAML config (defaults to ~/.snapstory/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the recognition HTTP service
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Submit an image file and print the story
    Recognize {
        /// Image file to upload
        path: PathBuf,
        /// Recognition endpoint (defaults to the configured local server)
        #[arg(long)]
        endpoint: Option<String>,
        /// Retries after the first attempt
        #[arg(long, default_value_t = 3)]
        max_retries: u32,
        /// Per-attempt timeout in milliseconds
        #[arg(long, default_value_t = 30_000)]
        timeout_ms: u64,
        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },
    /// Check whether a local server is up
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli.config.unwrap_or_else(|| config_file_path(&config_dir()));
    let mut config = apply_env_overrides(load_config(&path).await?);
    logging::init_logger(&config.server.log_level, config.server.log_dir.as_deref());
    ensure_valid(&config)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            info!(config = %path.display(), port = config.server.port, "Starting SnapStory");
            snapstory_gateway::start_server(&config).await?;
        }
        Commands::Recognize { path, endpoint, max_retries, timeout_ms, json } => {
            let endpoint = endpoint.unwrap_or_else(|| local_url(config.server.port, "/"));
            let options = recognize_cmd::RecognizeOptions { endpoint, max_retries, timeout_ms, json };
            recognize_cmd::run(&path, options).await?;
        }
        Commands::Status { port } => {
            let port = port.unwrap_or(config.server.port);
            status_cmd::run(&local_url(port, "/api/health")).await?;
        }
    }

    Ok(())
}

fn local_url(port: u16, path: &str) -> String {
    format!("http://localhost:{port}{path}")
}
