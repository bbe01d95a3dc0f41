//! murmur-server: password-gated WebSocket chat relay.
//!
//! Loads config, binds the listener and serves until Ctrl-C. Anything
//! still queued for broadcast is flushed before exit.

use std::path::PathBuf;

use clap::Parser;
use murmur_server::{serve, ServerState};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "murmur-server", about = "Password-gated WebSocket chat relay")]
struct Args {
    /// Config file (defaults to the platform config dir).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind, overriding the config file.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> murmur_common::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmur_server=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = murmur_config::load_config(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.listen.host = host;
    }
    if let Some(port) = args.port {
        config.listen.port = port;
    }

    let addr = config.listen.address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        path = %config.listen.path,
        mode = ?config.broadcast.mode,
        "murmur-server listening"
    );

    let state = ServerState::new(config);
    tokio::select! {
        _ = serve(listener, state.clone()) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            }
            tracing::info!("shutting down");
        }
    }

    state.broadcaster.flush().await;
    Ok(())
}
