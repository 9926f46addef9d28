//! Error taxonomy shared by every hop of the notes pipeline.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// External service responsible for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Upstream {
    Fireflies,
    Anthropic,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fireflies => "fireflies",
            Self::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding the credential for this upstream.
    pub fn key_variable(&self) -> &'static str {
        match self {
            Self::Fireflies => "FIREFLIES_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fireflies => write!(f, "Fireflies"),
            Self::Anthropic => write!(f, "Anthropic"),
        }
    }
}

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("{upstream} rejected the credentials: {message}")]
    Auth { upstream: Upstream, message: String },

    #[error("{upstream} is unavailable: {message}")]
    UpstreamUnavailable { upstream: Upstream, message: String },

    #[error("Recording {0} not found")]
    NotFound(String),

    #[error("Recording {0} is not ready yet, transcription may still be processing")]
    NotReady(String),

    #[error("No recordings available yet")]
    NoRecordingsAvailable,

    #[error("Summarization failed: {0}")]
    Model(String),
}

impl NotesError {
    pub fn auth(upstream: Upstream, message: impl Into<String>) -> Self {
        Self::Auth {
            upstream,
            message: message.into(),
        }
    }

    pub fn unavailable(upstream: Upstream, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            upstream,
            message: message.into(),
        }
    }

    /// Stable machine-readable tag, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "auth_error",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::NotFound(_) => "not_found",
            Self::NotReady(_) => "not_ready",
            Self::NoRecordingsAvailable => "no_recordings_available",
            Self::Model(_) => "model_error",
        }
    }

    pub fn upstream(&self) -> Option<Upstream> {
        match self {
            Self::Auth { upstream, .. } | Self::UpstreamUnavailable { upstream, .. } => {
                Some(*upstream)
            }
            Self::NotFound(_) | Self::NotReady(_) | Self::NoRecordingsAvailable => {
                Some(Upstream::Fireflies)
            }
            Self::Model(_) => Some(Upstream::Anthropic),
        }
    }

    /// Message shown to a person, with the next step they can take.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth { upstream, .. } => format!(
                "{}. Check that {} is set to a valid API key.",
                self,
                upstream.key_variable()
            ),
            Self::UpstreamUnavailable { .. } => format!("{}. Please try again later.", self),
            Self::NoRecordingsAvailable => {
                "No recordings found yet. Record a meeting and try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NotesError>;
