use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use todos_core::TodoStore;
use todos_server::{telemetry, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing()?;

    let config = Config::parse();
    let store_config = config.store_config()?;
    tracing::info!(
        limit = store_config.limit.get(),
        strategy = %store_config.strategy,
        policy = ?store_config.policy,
        "booting todos api"
    );

    let store = Arc::new(TodoStore::new(store_config));
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    todos_server::run(listener, store).await?;
    tracing::info!("shutdown complete");
    Ok(())
}
