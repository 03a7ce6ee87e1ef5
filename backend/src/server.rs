use std::{sync::Arc, time::Duration};

use axum::{Extension, Router};
use bucket_router::ObjectRouter;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{routes, types::Environment};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the application router with its shared state attached
#[must_use]
pub fn app(object_router: Arc<ObjectRouter>) -> Router {
    routes::handler()
        .layer(Extension(object_router))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}

/// Starts the server on the configured port
///
/// # Errors
///
/// Returns an error if `PORT` is invalid or the server fails to bind
pub async fn start(object_router: Arc<ObjectRouter>) -> anyhow::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], Environment::port()?));
    let router = app(object_router);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Bucket router backend started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
