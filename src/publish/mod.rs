//! Best-effort forwarding of summaries to a document-append endpoint.
//!
//! Publishing never fails the caller: every problem is folded into a
//! [`PublishResult`].

use crate::summarize::Summary;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    pub success: bool,
    /// False when no endpoint is configured and nothing was sent.
    pub attempted: bool,
    pub error: Option<String>,
}

impl PublishResult {
    pub fn skipped() -> Self {
        Self {
            success: true,
            attempted: false,
            error: None,
        }
    }

    pub fn published() -> Self {
        Self {
            success: true,
            attempted: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            attempted: true,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct PublishPayload<'a> {
    title: &'a str,
    date: String,
    summary: String,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    success: bool,
    error: Option<String>,
}

/// Destination for finished summaries.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, summary: &Summary, endpoint: Option<&str>) -> PublishResult;
}

/// Posts summaries as JSON to an endpoint that appends them to a document
/// (a Google Apps Script web app in the default setup).
pub struct DocumentPublisher {
    client: reqwest::Client,
}

impl DocumentPublisher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Publisher for DocumentPublisher {
    async fn publish(&self, summary: &Summary, endpoint: Option<&str>) -> PublishResult {
        let Some(endpoint) = endpoint else {
            debug!("No publish endpoint configured, skipping");
            return PublishResult::skipped();
        };

        let payload = PublishPayload {
            title: &summary.title,
            date: summary.date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            summary: summary.to_markdown(),
            timestamp: Utc::now().to_rfc3339(),
        };

        info!("Publishing summary \"{}\" to document endpoint", summary.title);

        let response = match self.client.post(endpoint).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to reach document endpoint: {}", e);
                return PublishResult::failed(format!("Failed to append to document: {}", e));
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!("Document endpoint returned status {}: {}", status, body);
            return PublishResult::failed(format!(
                "Document endpoint returned status {}",
                status
            ));
        }

        match serde_json::from_str::<PublishResponse>(&body) {
            Ok(PublishResponse { success: false, error }) => {
                let error = error.unwrap_or_else(|| "endpoint reported failure".to_string());
                warn!("Document endpoint rejected the summary: {}", error);
                PublishResult::failed(error)
            }
            _ => {
                info!("Summary appended to document");
                PublishResult::published()
            }
        }
    }
}
