//! HTTP front for `todos_core::TodoStore`.
//!
//! Handlers are stateless; the only shared state is the `Arc<TodoStore>`
//! carried as router state. Each handler decodes its input, runs exactly one
//! store operation, and encodes the result.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use todos_core::TodoStore;

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

pub use config::Config;
pub use error::{ApiError, ErrorResponse};
pub use routes::{app, app_with_config};
pub use todos_core::{Identifier, LimitStatus, Todo};

pub async fn run(listener: TcpListener, store: Arc<TodoStore>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
