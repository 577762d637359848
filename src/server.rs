use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::system::collector::Collector;
use crate::system::source::CounterSource;

const FAILURE_MESSAGE: &str = "Failed to fetch system stats";

pub struct AppState<S> {
    pub collector: Collector<S>,
    /// Processes returned to the client, out of the ranker's bound.
    pub display_limit: usize,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            collector: self.collector.clone(),
            display_limit: self.display_limit,
        }
    }
}

pub fn router<S: CounterSource>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/system-stats", get(system_stats::<S>))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn system_stats<S: CounterSource>(State(state): State<AppState<S>>) -> Response {
    match state.collector.collect().await {
        Ok(mut snapshot) => {
            snapshot.processes.truncate(state.display_limit);
            Json(snapshot).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "system stats request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": FAILURE_MESSAGE })),
            )
                .into_response()
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Resolves on Ctrl-C, or on SIGTERM where the platform has it, so service
/// managers and container runtimes get a graceful stop.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!(signal = "interrupt", "shutting down"),
        _ = terminate => tracing::info!(signal = "terminate", "shutting down"),
    }
}
