//! Orchestration of one "process recording" action:
//! fetch transcript → summarize → publish.

use crate::error::{NotesError, Result};
use crate::publish::{PublishResult, Publisher};
use crate::summarize::{default_sections, Summarizer, Summary};
use crate::transcript::{Recording, TranscriptSource, Utterance};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a successful run. Publishing may still have failed.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedRecording {
    pub recording_id: String,
    pub summary: Summary,
    pub publish: PublishResult,
}

impl ProcessedRecording {
    /// True only if the summary actually reached the document endpoint.
    pub fn published(&self) -> bool {
        self.publish.success && self.publish.attempted
    }
}

/// Debug view of a transcript, used to check what the provider returned.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptInspection {
    pub id: String,
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub duration: Option<f64>,
    pub sentence_count: usize,
    pub first_sentences: Vec<Utterance>,
    pub speakers: Vec<String>,
    pub has_content: bool,
}

pub struct Orchestrator {
    transcripts: Arc<dyn TranscriptSource>,
    summarizer: Summarizer,
    publisher: Arc<dyn Publisher>,
    publish_endpoint: Option<String>,
    sections: Vec<String>,
}

impl Orchestrator {
    pub fn new(
        transcripts: Arc<dyn TranscriptSource>,
        summarizer: Summarizer,
        publisher: Arc<dyn Publisher>,
        publish_endpoint: Option<String>,
    ) -> Self {
        Self {
            transcripts,
            summarizer,
            publisher,
            publish_endpoint,
            sections: default_sections(),
        }
    }

    pub fn with_publish_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.publish_endpoint = endpoint;
        self
    }

    pub fn with_sections(mut self, sections: Vec<String>) -> Self {
        self.sections = sections;
        self
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn publish_endpoint(&self) -> Option<&str> {
        self.publish_endpoint.as_deref()
    }

    pub async fn list_recent(&self, limit: usize) -> Result<Vec<Recording>> {
        self.transcripts.list_recent(limit).await
    }

    /// Summarize the newest recording.
    pub async fn process_latest(&self) -> Result<ProcessedRecording> {
        let latest = self
            .transcripts
            .list_recent(1)
            .await?
            .into_iter()
            .next()
            .ok_or(NotesError::NoRecordingsAvailable)?;

        info!("Latest recording is {} (\"{}\")", latest.id, latest.title);
        self.process_recording(&latest.id).await
    }

    pub async fn process_recording(&self, recording_id: &str) -> Result<ProcessedRecording> {
        info!(
            "Processing recording {} via {}",
            recording_id,
            self.transcripts.name()
        );

        let transcript = self.transcripts.fetch_transcript(recording_id).await?;
        let summary = self.summarizer.summarize(&transcript, &self.sections).await?;

        let publish = self
            .publisher
            .publish(&summary, self.publish_endpoint.as_deref())
            .await;
        if !publish.success {
            warn!(
                "Summary for {} was not published: {}",
                recording_id,
                publish.error.as_deref().unwrap_or("unknown error")
            );
        }

        Ok(ProcessedRecording {
            recording_id: transcript.recording_id,
            summary,
            publish,
        })
    }

    /// Fetch a transcript for inspection. A transcript that is still
    /// processing is reported with `has_content = false`.
    pub async fn inspect_transcript(&self, recording_id: &str) -> Result<TranscriptInspection> {
        match self.transcripts.fetch_transcript(recording_id).await {
            Ok(transcript) => Ok(TranscriptInspection {
                id: transcript.recording_id.clone(),
                title: Some(transcript.title.clone()),
                date: transcript.date,
                duration: Some(transcript.duration),
                sentence_count: transcript.utterances.len(),
                first_sentences: transcript.utterances.iter().take(3).cloned().collect(),
                speakers: transcript.speakers().into_iter().map(String::from).collect(),
                has_content: transcript.has_content(),
            }),
            Err(NotesError::NotReady(id)) => Ok(TranscriptInspection {
                id,
                title: None,
                date: None,
                duration: None,
                sentence_count: 0,
                first_sentences: Vec::new(),
                speakers: Vec::new(),
                has_content: false,
            }),
            Err(e) => Err(e),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;
    use crate::error::Upstream;
    use crate::summarize::{ACTION_ITEMS, KEY_TAKEAWAYS};
    use std::sync::atomic::Ordering;

    const REPLY: &str =
        "## Key Takeaways\n- Discussed roadmap\n## Action Items\n- Ship v2 by Friday";

    #[tokio::test]
    async fn test_process_latest_runs_full_sequence() {
        let transcripts = Arc::new(FakeTranscripts::with_transcript(
            "rec-1",
            "We discussed the roadmap. Action: ship v2 by Friday.",
        ));
        let model = Arc::new(FakeModel::replying(REPLY));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::published()));

        let result = orchestrator(transcripts.clone(), model.clone(), publisher.clone())
            .process_latest()
            .await
            .unwrap();

        assert_eq!(result.recording_id, "rec-1");
        assert!(result.published());
        assert_eq!(result.summary.section(KEY_TAKEAWAYS).unwrap(), ["Discussed roadmap"]);
        assert_eq!(result.summary.section(ACTION_ITEMS).unwrap(), ["Ship v2 by Friday"]);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            publisher.endpoints.lock().unwrap().as_slice(),
            [Some("https://docs.example.com/append".to_string())]
        );
    }

    #[tokio::test]
    async fn test_process_latest_without_recordings() {
        let transcripts = Arc::new(FakeTranscripts::default());
        let model = Arc::new(FakeModel::replying(REPLY));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::published()));

        let err = orchestrator(transcripts.clone(), model.clone(), publisher.clone())
            .process_latest()
            .await
            .unwrap_err();

        assert!(matches!(err, NotesError::NoRecordingsAvailable));
        assert_eq!(transcripts.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_failure_propagates() {
        let transcripts = Arc::new(FakeTranscripts::default());
        *transcripts.list_error.lock().unwrap() =
            Some(NotesError::auth(Upstream::Fireflies, "Invalid API key"));
        let model = Arc::new(FakeModel::replying(REPLY));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::published()));

        let err = orchestrator(transcripts, model, publisher)
            .process_latest()
            .await
            .unwrap_err();
        assert!(matches!(err, NotesError::Auth { upstream: Upstream::Fireflies, .. }));
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_abort() {
        let transcripts = Arc::new(FakeTranscripts::with_transcript("rec-1", "Hello"));
        let model = Arc::new(FakeModel::replying(REPLY));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::failed(
            "Document endpoint returned status 500 Internal Server Error",
        )));

        let result = orchestrator(transcripts, model, publisher)
            .process_recording("rec-1")
            .await
            .unwrap();

        assert!(!result.published());
        assert!(!result.publish.success);
        assert_eq!(result.summary.section(KEY_TAKEAWAYS).unwrap(), ["Discussed roadmap"]);
    }

    #[tokio::test]
    async fn test_unknown_recording_aborts_before_model() {
        let transcripts = Arc::new(FakeTranscripts::with_transcript("rec-1", "Hello"));
        let model = Arc::new(FakeModel::replying(REPLY));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::published()));

        let err = orchestrator(transcripts, model.clone(), publisher.clone())
            .process_recording("nope")
            .await
            .unwrap_err();

        assert!(matches!(err, NotesError::NotFound(id) if id == "nope"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_model_failure_aborts_before_publish() {
        let transcripts = Arc::new(FakeTranscripts::with_transcript("rec-1", "Hello"));
        let model = Arc::new(FakeModel::failing(|| NotesError::Model("timed out".into())));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::published()));

        let err = orchestrator(transcripts, model, publisher.clone())
            .process_recording("rec-1")
            .await
            .unwrap_err();

        assert!(matches!(err, NotesError::Model(_)));
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_publishing_passes_no_endpoint() {
        let transcripts = Arc::new(FakeTranscripts::with_transcript("rec-1", "Hello"));
        let model = Arc::new(FakeModel::replying(REPLY));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::skipped()));

        let result = orchestrator(transcripts, model, publisher.clone())
            .with_publish_endpoint(None)
            .process_recording("rec-1")
            .await
            .unwrap();

        assert!(result.publish.success);
        assert!(!result.published());
        assert_eq!(publisher.endpoints.lock().unwrap().as_slice(), [None]);
    }

    #[tokio::test]
    async fn test_custom_sections_follow_fixed_ones() {
        let transcripts = Arc::new(FakeTranscripts::with_transcript("rec-1", "Hello"));
        let model = Arc::new(FakeModel::replying("## Decisions\n- Go with vendor B"));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::skipped()));

        let mut sections = default_sections();
        sections.push("Decisions".to_string());
        let result = orchestrator(transcripts, model, publisher)
            .with_sections(sections)
            .process_recording("rec-1")
            .await
            .unwrap();

        let names: Vec<&str> = result.summary.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names[4], "Decisions");
        assert_eq!(result.summary.section("decisions").unwrap(), ["Go with vendor B"]);
        assert!(result.summary.warning.is_none());
    }

    #[tokio::test]
    async fn test_inspect_not_ready_transcript() {
        let transcripts = Arc::new(FakeTranscripts::with_transcript("rec-1", "   "));
        let model = Arc::new(FakeModel::replying(REPLY));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::published()));

        let inspection = orchestrator(transcripts, model, publisher)
            .inspect_transcript("rec-1")
            .await
            .unwrap();

        assert!(!inspection.has_content);
        assert_eq!(inspection.sentence_count, 0);
        assert_eq!(inspection.id, "rec-1");
    }

    #[tokio::test]
    async fn test_inspect_ready_transcript() {
        let transcripts = Arc::new(FakeTranscripts::with_transcript("rec-1", "Hello there"));
        let model = Arc::new(FakeModel::replying(REPLY));
        let publisher = Arc::new(FakePublisher::returning(PublishResult::published()));

        let inspection = orchestrator(transcripts, model, publisher)
            .inspect_transcript("rec-1")
            .await
            .unwrap();

        assert!(inspection.has_content);
        assert_eq!(inspection.sentence_count, 1);
        assert_eq!(inspection.speakers, vec!["Ana".to_string()]);
    }
}
