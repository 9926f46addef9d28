//! Transcript summarization through a language model.
//!
//! The summarizer builds one prompt per transcript, calls the model once and
//! parses the markdown reply into the fixed summary sections. Nothing is
//! cached: every call goes back to the model.

use crate::error::{NotesError, Result};
use crate::transcript::Transcript;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod anthropic;
pub mod parser;
pub mod prompt;

pub use anthropic::AnthropicClient;

pub const KEY_TAKEAWAYS: &str = "Key Takeaways";
pub const ACTION_ITEMS: &str = "Action Items";
pub const FOLLOW_UP_QUESTIONS: &str = "Follow-up Questions";
pub const NOTABLE_QUOTES: &str = "Notable Quotes";

/// Sections every summary carries, in canonical order.
pub const FIXED_SECTIONS: [&str; 4] =
    [KEY_TAKEAWAYS, ACTION_ITEMS, FOLLOW_UP_QUESTIONS, NOTABLE_QUOTES];

pub fn default_sections() -> Vec<String> {
    FIXED_SECTIONS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub items: Vec<String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }
}

/// Non-fatal problems found while parsing a model reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryWarning {
    NoRecognizedHeadings,
}

impl fmt::Display for SummaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRecognizedHeadings => write!(
                f,
                "The model reply contained none of the requested section headings; \
                 see the raw output"
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub transcript_text: String,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub sections: Vec<String>,
}

impl SummaryRequest {
    pub fn from_transcript(transcript: &Transcript, sections: &[String]) -> Self {
        Self {
            transcript_text: transcript.text(),
            title: transcript.title.clone(),
            date: transcript.date,
            sections: sections.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub sections: Vec<Section>,
    pub raw: String,
    pub warning: Option<SummaryWarning>,
}

impl Summary {
    /// Build a summary from a model reply.
    pub fn parse(
        title: impl Into<String>,
        date: Option<DateTime<Utc>>,
        raw: impl Into<String>,
        requested: &[String],
    ) -> Self {
        let raw = raw.into();
        let parsed = parser::parse_sections(&raw, requested);
        let warning =
            (parsed.recognized_headings == 0).then_some(SummaryWarning::NoRecognizedHeadings);

        Self {
            title: title.into(),
            date,
            sections: parsed.sections,
            raw,
            warning,
        }
    }

    pub fn section(&self, name: &str) -> Option<&[String]> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.items.as_slice())
    }

    pub fn to_markdown(&self) -> String {
        parser::render_markdown(&self.sections)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.items.is_empty())
    }
}

/// A text-completion backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send one prompt and return the generated text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn summarize(&self, transcript: &Transcript, sections: &[String]) -> Result<Summary> {
        let request = SummaryRequest::from_transcript(transcript, sections);
        if request.transcript_text.trim().is_empty() {
            return Err(NotesError::NotReady(transcript.recording_id.clone()));
        }
        self.summarize_request(&request).await
    }

    pub async fn summarize_request(&self, request: &SummaryRequest) -> Result<Summary> {
        let prompt = prompt::build_prompt(request);

        info!(
            "Summarizing \"{}\" with {} ({} chars of transcript)",
            request.title,
            self.model.name(),
            request.transcript_text.len()
        );

        let raw = self.model.complete(&prompt).await?;
        debug!("Raw model output: {}", raw);

        let summary = Summary::parse(&request.title, request.date, raw, &request.sections);
        if let Some(warning) = summary.warning {
            warn!("{}", warning);
        }
        Ok(summary)
    }
}
