//! Recording endpoints.
//!
//! - List recent recordings (GET /api/transcripts)
//! - Process a specific recording (GET /api/process/:id)
//! - Process the newest recording (GET /api/process-latest)
//! - Inspect raw transcript data (GET /api/debug/:id)

use crate::api::error::{ApiError, ApiResult};
use crate::pipeline::{Orchestrator, ProcessedRecording, TranscriptInspection};
use crate::summarize::Section;
use crate::transcript::Recording;
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Shared state for recording routes.
#[derive(Clone)]
pub struct RecordingsState {
    pub orchestrator: Arc<Orchestrator>,
    pub list_limit: usize,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListQueryParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecordingList {
    pub transcripts: Vec<Recording>,
}

/// JSON shape of a processed recording.
#[derive(Debug, Serialize)]
pub struct ProcessedResponse {
    pub recording_id: String,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub summary: String,
    pub sections: Vec<Section>,
    pub raw: String,
    pub warning: Option<String>,
    pub published: bool,
    pub publish_attempted: bool,
    pub publish_error: Option<String>,
}

impl From<ProcessedRecording> for ProcessedResponse {
    fn from(result: ProcessedRecording) -> Self {
        let published = result.published();
        let summary = result.summary;
        Self {
            recording_id: result.recording_id,
            summary: summary.to_markdown(),
            warning: summary.warning.map(|w| w.to_string()),
            title: summary.title,
            date: summary.date,
            sections: summary.sections,
            raw: summary.raw,
            published,
            publish_attempted: result.publish.attempted,
            publish_error: result.publish.error,
        }
    }
}

pub fn router(state: RecordingsState) -> Router {
    Router::new()
        .route("/api/transcripts", get(list_transcripts))
        .route("/api/process/:id", get(process_recording))
        .route("/api/process-latest", get(process_latest))
        .route("/api/debug/:id", get(debug_transcript))
        .with_state(state)
}

/// GET /api/transcripts - List recent recordings.
async fn list_transcripts(
    Query(params): Query<ListQueryParams>,
    State(state): State<RecordingsState>,
) -> ApiResult<Json<RecordingList>> {
    let limit = params.limit.unwrap_or(state.list_limit);
    let transcripts = state
        .orchestrator
        .list_recent(limit)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(RecordingList { transcripts }))
}

/// GET /api/process/:id - Fetch, summarize and publish one recording.
async fn process_recording(
    Path(id): Path<String>,
    State(state): State<RecordingsState>,
) -> ApiResult<Json<ProcessedResponse>> {
    info!("Process request received for recording {}", id);
    let result = state
        .orchestrator
        .process_recording(&id)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(result.into()))
}

/// GET /api/process-latest - Process the newest recording.
async fn process_latest(
    State(state): State<RecordingsState>,
) -> ApiResult<Json<ProcessedResponse>> {
    info!("Process request received for latest recording");
    let result = state
        .orchestrator
        .process_latest()
        .await
        .map_err(ApiError::from)?;
    Ok(Json(result.into()))
}

/// GET /api/debug/:id - Inspect what the provider returned for a recording.
async fn debug_transcript(
    Path(id): Path<String>,
    State(state): State<RecordingsState>,
) -> ApiResult<Json<TranscriptInspection>> {
    let inspection = state
        .orchestrator
        .inspect_transcript(&id)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(inspection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fakes::{orchestrator, FakeModel, FakePublisher, FakeTranscripts};
    use crate::publish::PublishResult;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    const REPLY: &str =
        "## Key Takeaways\n- Discussed roadmap\n## Action Items\n- Ship v2 by Friday";

    fn app(transcripts: FakeTranscripts, publish: PublishResult) -> Router {
        router(RecordingsState {
            orchestrator: Arc::new(orchestrator(
                Arc::new(transcripts),
                Arc::new(FakeModel::replying(REPLY)),
                Arc::new(FakePublisher::returning(publish)),
            )),
            list_limit: 10,
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_transcripts() {
        let app = app(
            FakeTranscripts::with_transcript("rec-1", "Hello"),
            PublishResult::published(),
        );
        let (status, body) = get_json(app, "/api/transcripts?limit=5").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcripts"][0]["id"], "rec-1");
        assert_eq!(body["transcripts"][0]["status"], "completed");
    }

    #[tokio::test]
    async fn test_process_recording_reports_publish_failure() {
        let app = app(
            FakeTranscripts::with_transcript("rec-1", "Hello"),
            PublishResult::failed("Document endpoint returned status 500"),
        );
        let (status, body) = get_json(app, "/api/process/rec-1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["published"], false);
        assert_eq!(body["publish_attempted"], true);
        assert_eq!(body["publish_error"], "Document endpoint returned status 500");
        assert_eq!(body["sections"][0]["name"], "Key Takeaways");
        assert_eq!(body["sections"][0]["items"][0], "Discussed roadmap");
        assert_eq!(body["sections"].as_array().unwrap().len(), 4);
        assert!(body["summary"]
            .as_str()
            .unwrap()
            .starts_with("## Key Takeaways\n- Discussed roadmap"));
    }

    #[tokio::test]
    async fn test_process_latest_without_recordings() {
        let app = app(FakeTranscripts::default(), PublishResult::published());
        let (status, body) = get_json(app, "/api/process-latest").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], true);
        assert_eq!(body["kind"], "no_recordings_available");
    }

    #[tokio::test]
    async fn test_process_unknown_recording() {
        let app = app(
            FakeTranscripts::with_transcript("rec-1", "Hello"),
            PublishResult::published(),
        );
        let (status, body) = get_json(app, "/api/process/missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
        assert_eq!(body["upstream"], "fireflies");
    }

    #[tokio::test]
    async fn test_debug_transcript() {
        let app = app(
            FakeTranscripts::with_transcript("rec-1", "Hello"),
            PublishResult::published(),
        );
        let (status, body) = get_json(app, "/api/debug/rec-1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_content"], true);
        assert_eq!(body["sentence_count"], 1);
        assert_eq!(body["first_sentences"][0]["speaker"], "Ana");
    }
}
