//! JSON HTTP API for the notes pipeline.
//!
//! Provides HTTP endpoints for:
//! - Health and configuration status
//! - Listing recent recordings
//! - Processing a specific or the latest recording
//! - Inspecting raw transcript data

pub mod error;
pub mod routes;

use crate::config::{Config, ConfigStatus};
use crate::pipeline::Orchestrator;
use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub use routes::recordings::RecordingsState;

pub struct ApiServer {
    host: String,
    port: u16,
    status: ConfigStatus,
    recordings_state: RecordingsState,
}

impl ApiServer {
    pub fn new(orchestrator: Arc<Orchestrator>, config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            status: config.status(),
            recordings_state: RecordingsState {
                orchestrator,
                list_limit: config.fireflies.list_limit,
            },
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(service_info))
            .merge(routes::health::router(self.status))
            .merge(routes::recordings::router(self.recordings_state.clone()))
    }

    pub async fn start(self) -> Result<()> {
        let app = self.router();

        let address = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {}", address))?;

        info!("API server listening on http://{}", address);
        info!("Endpoints:");
        info!("  GET  /                    - Service info");
        info!("  GET  /health              - Configuration status");
        info!("  GET  /api/transcripts     - List recent recordings");
        info!("  GET  /api/process/:id     - Summarize a recording");
        info!("  GET  /api/process-latest  - Summarize the newest recording");
        info!("  GET  /api/debug/:id       - Inspect raw transcript data");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "conference-notes",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fakes::{orchestrator, FakeModel, FakePublisher, FakeTranscripts};
    use crate::publish::PublishResult;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let mut config = Config::default();
        config.fireflies.api_key = Some("ff-key".to_string());

        let orchestrator = Arc::new(orchestrator(
            Arc::new(FakeTranscripts::default()),
            Arc::new(FakeModel::replying("")),
            Arc::new(FakePublisher::returning(PublishResult::skipped())),
        ));
        let app = ApiServer::new(orchestrator, &config).router();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["fireflies_configured"], true);
        assert_eq!(body["anthropic_configured"], false);
        assert_eq!(body["publish_configured"], false);
    }
}
