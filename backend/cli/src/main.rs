mod config;
mod status_cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use psychoscore_config::defaults::DEFAULT_PORT;
use psychoscore_config::{load_and_prepare, validate, PsychoScoreConfig};
use psychoscore_gateway::{start_server, GatewayState};
use psychoscore_logging::init_logger;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "psychoscore")]
#[command(about = "PsychoScore: business card critiques in a familiar voice")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Path to a YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check whether a server is answering
    Status {
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Print the effective configuration with secrets masked
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config: config_flag } => {
            let path = config::resolve_config_path(config_flag);
            let mut config = load_and_prepare(&path).await?;
            if let Some(port) = port {
                config.server.port = port;
            }
            let _guard = init_logger(&config.logging);
            info!(path = %path.display(), exists = path.exists(), "Using config file");
            run_server(config).await?;
        }
        Commands::Status { port } => status_cmd::run(port).await?,
        Commands::Config { config: config_flag } => {
            let path = config::resolve_config_path(config_flag);
            config::run(&path).await?;
        }
    }

    Ok(())
}

async fn run_server(config: PsychoScoreConfig) -> Result<()> {
    for warning in validate(&config).warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    info!(
        port = config.server.port,
        bind = %config.server.bind,
        model = %config.gemini.model,
        audio_dir = %config.storage.audio_output_path.display(),
        "Starting PsychoScore"
    );
    let state = GatewayState::from_config(&config).context("Failed to build service state")?;
    start_server(&config, state).await
}
