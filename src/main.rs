mod auth;
mod commands;
mod config;
mod logging;
mod rewrite;
mod server;

use std::net::{IpAddr, SocketAddr};

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mirrorbot", version, about = "Slash-command link rewriting service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the server (the default when no subcommand is given)
    Start,
    /// Print the version and exit
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Start) => run_server().await,
        Some(Command::Version) => {
            println!("mirrorbot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    let cfg = config::load_config().unwrap_or_else(|e| {
        warn!("Failed to load config: {}, using defaults", e);
        Value::Object(serde_json::Map::new())
    });

    let http_config = server::build_http_config(&cfg)?;
    if http_config.slash_token.is_none() {
        warn!("No slash token configured (set MM_SLASH_TOKEN); all command requests will be rejected");
    }

    let bind_address = resolve_bind_address(&cfg)?;

    info!("mirrorbot v{}", env!("CARGO_PKG_VERSION"));
    info!("Listening on http://{}", bind_address);
    info!(
        "Substitution rules loaded: {}",
        http_config.rules.rules().len()
    );

    let handle = server::run_server_with_config(server::ServerConfig {
        http_config,
        bind_address,
    })
    .await?;

    let reason = await_shutdown_trigger().await;
    info!("Shutdown signal received ({})", reason);
    handle.shutdown().await;
    info!("Server shut down");
    Ok(())
}

/// Initialize logging based on the MIRRORBOT_DEV environment variable.
fn init_logging_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let log_config = if std::env::var("MIRRORBOT_DEV")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
    {
        logging::LogConfig::development()
    } else {
        logging::LogConfig::production()
    };
    logging::init_logging(log_config)?;
    Ok(())
}

/// Parse the bind address and port from the server configuration section.
/// MIRRORBOT_PORT overrides the configured port.
fn resolve_bind_address(cfg: &Value) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    let section = cfg.get("server").and_then(|v| v.as_object());

    let host: IpAddr = section
        .and_then(|s| s.get("bind"))
        .and_then(|v| v.as_str())
        .unwrap_or("127.0.0.1")
        .parse()?;

    let port = std::env::var("MIRRORBOT_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .or_else(|| {
            section
                .and_then(|s| s.get("port"))
                .and_then(|v| v.as_u64())
                .map(|p| p as u16)
        })
        .unwrap_or(8000);

    Ok(SocketAddr::new(host, port))
}

/// Wait for either Ctrl+C or SIGTERM (Unix only) and return a label for logging.
#[cfg(unix)]
async fn await_shutdown_trigger() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => "ctrl-c",
                _ = sigterm.recv() => "SIGTERM",
            }
        }
        Err(e) => {
            warn!(
                "Failed to install SIGTERM handler: {}; falling back to Ctrl+C only",
                e
            );
            match tokio::signal::ctrl_c().await {
                Ok(()) => "ctrl-c",
                Err(e) => {
                    panic!("Failed to install Ctrl+C handler: {}", e);
                }
            }
        }
    }
}

/// On non-Unix platforms, only Ctrl+C is available.
#[cfg(not(unix))]
async fn await_shutdown_trigger() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "ctrl-c",
        Err(e) => {
            panic!("Failed to install Ctrl+C handler: {}", e);
        }
    }
}
