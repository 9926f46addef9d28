use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};

use super::{Recording, Transcript, TranscriptSource, TranscriptionStatus, Utterance};
use crate::error::{NotesError, Result, Upstream};

const LIST_TRANSCRIPTS_QUERY: &str = r#"
query ListTranscripts($limit: Int) {
    transcripts(limit: $limit) {
        id
        title
        date
        duration
        organizer_email
        sentences {
            speaker_name
            text
        }
    }
}
"#;

const GET_TRANSCRIPT_QUERY: &str = r#"
query GetTranscript($id: String!) {
    transcript(id: $id) {
        id
        title
        date
        duration
        organizer_email
        sentences {
            speaker_name
            text
        }
    }
}
"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct ErrorExtensions {
    #[serde(default)]
    code: Option<ErrorCode>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum ErrorCode {
    ObjectNotFound,
    AuthFailed,
    Unauthenticated,
    Unauthorized,
    Forbidden,
    TooManyRequests,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ListData {
    transcripts: Option<Vec<TranscriptNode>>,
}

#[derive(Debug, Deserialize)]
struct GetData {
    transcript: Option<TranscriptNode>,
}

#[derive(Debug, Deserialize)]
struct TranscriptNode {
    id: String,
    title: Option<String>,
    date: Option<DateValue>,
    duration: Option<f64>,
    organizer_email: Option<String>,
    sentences: Option<Vec<SentenceNode>>,
}

#[derive(Debug, Deserialize)]
struct SentenceNode {
    speaker_name: Option<String>,
    text: Option<String>,
}

/// Fireflies reports `date` as epoch milliseconds; accept ISO strings too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DateValue {
    Millis(f64),
    Text(String),
}

impl DateValue {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms as i64),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|d| d.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    text.parse::<i64>()
                        .ok()
                        .and_then(DateTime::<Utc>::from_timestamp_millis)
                }),
        }
    }
}

impl TranscriptNode {
    fn title(&self) -> String {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled")
            .to_string()
    }

    fn utterances(&self) -> Vec<Utterance> {
        self.sentences
            .iter()
            .flatten()
            .filter_map(|s| {
                let text = s.text.as_deref()?.trim();
                (!text.is_empty()).then(|| Utterance {
                    speaker: s.speaker_name.clone().filter(|n| !n.trim().is_empty()),
                    text: text.to_string(),
                })
            })
            .collect()
    }

    fn into_recording(self) -> Recording {
        let status = if self.utterances().is_empty() {
            TranscriptionStatus::Processing
        } else {
            TranscriptionStatus::Completed
        };
        Recording {
            title: self.title(),
            date: self.date.as_ref().and_then(DateValue::to_utc),
            duration: self.duration.unwrap_or(0.0),
            organizer_email: self.organizer_email.filter(|e| !e.is_empty()),
            status,
            id: self.id,
        }
    }

    fn into_transcript(self) -> Transcript {
        Transcript {
            title: self.title(),
            date: self.date.as_ref().and_then(DateValue::to_utc),
            duration: self.duration.unwrap_or(0.0),
            utterances: self.utterances(),
            recording_id: self.id,
        }
    }
}

/// Client for the Fireflies.ai GraphQL API.
pub struct FirefliesClient {
    client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
}

impl FirefliesClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>, api_url: String) -> Self {
        info!("Initialized Fireflies client with API URL: {}", api_url);

        Self {
            client,
            api_key,
            api_url,
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        recording_id: Option<&str>,
    ) -> Result<T> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| NotesError::auth(Upstream::Fireflies, "API key not configured"))?;

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| {
                error!("Fireflies request failed: {}", e);
                NotesError::unavailable(Upstream::Fireflies, format!("request failed: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            NotesError::unavailable(
                Upstream::Fireflies,
                format!("failed to read response body: {}", e),
            )
        })?;

        let parsed = serde_json::from_str::<GraphQlResponse<T>>(&response_text);

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            let message = parsed
                .ok()
                .and_then(|r| r.errors.into_iter().next())
                .map(|e| e.message)
                .unwrap_or_else(|| format!("status {}", status));
            return Err(NotesError::auth(Upstream::Fireflies, message));
        }

        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(
                    "Fireflies returned an unreadable response with status {}: {}",
                    status, response_text
                );
                let message = if status.is_success() {
                    format!("unexpected response: {}", e)
                } else {
                    format!("status {}: {}", status, response_text)
                };
                return Err(NotesError::unavailable(Upstream::Fireflies, message));
            }
        };

        if !parsed.errors.is_empty() {
            return Err(classify_errors(parsed.errors, recording_id));
        }

        if !status.is_success() {
            return Err(NotesError::unavailable(
                Upstream::Fireflies,
                format!("status {}: {}", status, response_text),
            ));
        }

        parsed.data.ok_or_else(|| {
            NotesError::unavailable(Upstream::Fireflies, "response contained no data")
        })
    }
}

/// Map GraphQL errors onto the notes error taxonomy, most specific first.
fn classify_errors(errors: Vec<GraphQlError>, recording_id: Option<&str>) -> NotesError {
    let codes: Vec<&ErrorCode> = errors
        .iter()
        .filter_map(|e| e.extensions.as_ref().and_then(|x| x.code.as_ref()))
        .collect();
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    error!("Fireflies API error: {}", message);

    if codes.iter().any(|c| {
        matches!(
            c,
            ErrorCode::AuthFailed
                | ErrorCode::Unauthenticated
                | ErrorCode::Unauthorized
                | ErrorCode::Forbidden
        )
    }) {
        return NotesError::auth(Upstream::Fireflies, message);
    }

    if let Some(id) = recording_id {
        if codes.contains(&&ErrorCode::ObjectNotFound) {
            return NotesError::NotFound(id.to_string());
        }
    }

    NotesError::unavailable(Upstream::Fireflies, message)
}

#[async_trait]
impl TranscriptSource for FirefliesClient {
    fn name(&self) -> &'static str {
        "Fireflies"
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Recording>> {
        debug!("Listing {} recent Fireflies transcripts", limit);

        let data: ListData = self
            .query(LIST_TRANSCRIPTS_QUERY, json!({ "limit": limit }), None)
            .await?;

        let mut recordings: Vec<Recording> = data
            .transcripts
            .unwrap_or_default()
            .into_iter()
            .map(TranscriptNode::into_recording)
            .collect();
        recordings.sort_by(|a, b| b.date.cmp(&a.date));
        recordings.truncate(limit);

        info!("Fetched {} recordings from Fireflies", recordings.len());
        Ok(recordings)
    }

    async fn fetch_transcript(&self, recording_id: &str) -> Result<Transcript> {
        debug!("Fetching Fireflies transcript {}", recording_id);

        let data: GetData = self
            .query(
                GET_TRANSCRIPT_QUERY,
                json!({ "id": recording_id }),
                Some(recording_id),
            )
            .await?;

        let transcript = data
            .transcript
            .ok_or_else(|| NotesError::NotFound(recording_id.to_string()))?
            .into_transcript();

        if !transcript.has_content() {
            return Err(NotesError::NotReady(recording_id.to_string()));
        }

        info!(
            "Fetched transcript {} ({} utterances)",
            recording_id,
            transcript.utterances.len()
        );
        Ok(transcript)
    }
}
