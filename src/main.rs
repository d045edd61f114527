//! Table server (default binary).
//!
//! Reads `SKYJO_*` environment variables, binds, and serves one table until
//! Ctrl-C.

use anyhow::Result;
use tokio::sync::oneshot;

use skyjo::adapter::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    log::info!(
        "[server] seed {:?}, redact hidden {}, initiative each round {}",
        config.seed,
        config.redact_hidden,
        config.initiative_each_round
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                log::warn!("[server] no Ctrl-C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    });

    run_server(config, None, shutdown_rx).await
}
