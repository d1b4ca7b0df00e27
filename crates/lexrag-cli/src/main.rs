use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use lexrag_application::SessionController;
use lexrag_infrastructure::ConfigService;
use lexrag_interaction::HttpBackendGateway;

mod commands;
mod files;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "lexrag")]
#[command(about = "LexRAG - ask questions about your legal documents", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/lexrag/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Chat,
    /// List the documents the backend has indexed
    Documents,
    /// Ask a single question and exit
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let mut config = config_service
        .get_config()
        .context("Failed to load configuration")?;
    if let Some(backend) = cli.backend {
        config = config.with_backend_url(backend);
    }

    let _log_guard = logging::init(&config.log_filter)?;

    let gateway = HttpBackendGateway::from_config(&config)
        .with_context(|| format!("Invalid backend URL: {}", config.backend_url))?;
    tracing::info!("[Main] Backend: {}", gateway.base_url());
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();
    let session = Arc::new(SessionController::new(Arc::new(gateway), config, notice_tx));

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(session, notice_rx).await?,
        Commands::Documents => commands::documents::run(&session).await?,
        Commands::Ask { question } => {
            commands::ask::run(&session, notice_rx, &question.join(" ")).await?
        }
    }

    Ok(())
}
