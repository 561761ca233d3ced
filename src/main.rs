// gemrelay - relay system/user prompts to Gemini with a server-held API key
// Author: kelexine (https://github.com/kelexine)

use anyhow::{Context, Result};
use clap::Parser;
use gemrelay::cli::{Args, Command};
use gemrelay::config::AppConfig;
use gemrelay::credentials::EnvCredentials;
use gemrelay::gemini::GeminiClient;
use gemrelay::handler::AnalysisHandler;
use gemrelay::models::HandlerEvent;
use gemrelay::server::create_router;
use gemrelay::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load_from(args.config.as_deref())?;

    let command = args.command();
    if command == Command::Config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting gemrelay v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the handler. The key is read per invocation, not here.
    let credentials = Arc::new(EnvCredentials::new(config.gemini.api_key_env.clone()));
    let client = GeminiClient::new(&config.gemini)?
        .sanitize_logs(config.logging.sanitize_credentials);
    let handler = AnalysisHandler::new(client, credentials);

    if !handler.credential_configured() {
        warn!(
            "{} is not set; requests will fail until it is",
            config.gemini.api_key_env
        );
    }

    match command {
        Command::Invoke => invoke_once(&handler).await,
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(&config, handler).await
        }
        Command::Config => Ok(()),
    }
}

/// Run a single invocation: event JSON on stdin, response JSON on stdout.
async fn invoke_once(handler: &AnalysisHandler) -> Result<()> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read event from stdin")?;

    let event: HandlerEvent =
        serde_json::from_str(&input).context("stdin is not a valid handler event")?;
    let response = handler.handle(event).await;

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

async fn serve(config: &AppConfig, handler: AnalysisHandler) -> Result<()> {
    info!("Using model {}", handler.model());

    let app = create_router(&config.server, handler);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
