//! Health check route.

use crate::config::ConfigStatus;
use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};

pub fn router(status: ConfigStatus) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(status)
}

/// GET /health - Report which integrations are configured.
async fn health(State(status): State<ConfigStatus>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "fireflies_configured": status.fireflies_configured,
        "anthropic_configured": status.anthropic_configured,
        "publish_configured": status.publish_configured,
    }))
}
