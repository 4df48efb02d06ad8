//! Liveness HTTP endpoint for container health checks.

use std::net::SocketAddr;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// State shared with the health handler.
#[derive(Clone)]
struct AppState {
    container_id: String,
}

/// Body of the `/health` response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub container_id: String,
}

/// Minimal HTTP server exposing `/health`.
///
/// Runs instead of the monitor loop when the process is started in
/// health-server mode.
pub struct HealthServer {
    state: AppState,
    port: u16,
}

impl HealthServer {
    pub fn new(port: u16, container_id: impl Into<String>) -> Self {
        Self {
            state: AppState {
                container_id: container_id.into(),
            },
            port,
        }
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/health", get(handle_health))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve until the process exits.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let router = self.routes();

        tracing::info!("Health server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        container_id: state.container_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_shape() {
        let response = HealthResponse {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339(),
            container_id: "abc123".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["container_id"], "abc123");
        assert!(json["timestamp"].is_string());
    }
}
