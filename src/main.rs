use anyhow::{Context, Result};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use eid_auth::{cleanup, routing, AuthService, ServerConfig, StaticKeyResolver};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting eID authentication server");

    let keys = StaticKeyResolver::from_base64(&config.public_key)
        .context("Invalid EID_AUTH_PUBLIC_KEY")?;
    keys.key()
        .verifying_key()
        .context("Configured public key is not a valid P-384 point")?;
    info!(fingerprint = %keys.key().fingerprint(), "Client public key loaded");

    let service = Arc::new(AuthService::new(config.challenge_store(), Arc::new(keys)));

    match config.challenge_ttl {
        Some(ttl) => {
            let period = Duration::from_secs(config.cleanup_interval.max(1));
            tokio::spawn(cleanup::run_cleanup_loop(service.clone(), period));
            info!("Challenge expiry enabled (TTL={}s, sweep every {}s)", ttl, period.as_secs());
        }
        None => warn!("Challenge expiry disabled, unconsumed challenges are kept until restart"),
    }

    let app = routing::create_router(service, config.cors_origins.as_deref());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid bind address")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(tokio::signal::ctrl_c()))
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}

/// Resolve once `signal` fires; keep serving if the handler cannot be installed.
async fn wait_for_shutdown(signal: impl Future<Output = io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Cannot listen for shutdown signal, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
