//! Recordings and transcripts fetched from the meeting-recording provider.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod fireflies;

pub use fireflies::FirefliesClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionStatus {
    Processing,
    Completed,
}

/// One captured meeting or voice note, as listed by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    /// Length in minutes, as reported by the provider
    pub duration: f64,
    pub organizer_email: Option<String>,
    pub status: TranscriptionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub recording_id: String,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub duration: f64,
    pub utterances: Vec<Utterance>,
}

impl Transcript {
    /// Readable text, one `Speaker: text` line per utterance.
    pub fn text(&self) -> String {
        self.utterances
            .iter()
            .map(|u| format!("{}: {}", u.speaker.as_deref().unwrap_or("Unknown"), u.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Distinct speaker labels in order of first appearance.
    pub fn speakers(&self) -> Vec<&str> {
        let mut speakers: Vec<&str> = Vec::new();
        for speaker in self.utterances.iter().filter_map(|u| u.speaker.as_deref()) {
            if !speakers.contains(&speaker) {
                speakers.push(speaker);
            }
        }
        speakers
    }

    pub fn has_content(&self) -> bool {
        self.utterances.iter().any(|u| !u.text.trim().is_empty())
    }
}

/// Source of recordings and their transcripts.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Recent recordings, newest first. No recordings is `Ok(vec![])`.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Recording>>;

    /// Fetch the full transcript of one recording.
    ///
    /// Fails with `NotFound` for unknown ids and `NotReady` while the
    /// provider is still transcribing.
    async fn fetch_transcript(&self, recording_id: &str) -> Result<Transcript>;
}
