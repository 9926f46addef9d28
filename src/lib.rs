//! Meeting transcript summaries: fetch a transcript from Fireflies, summarize
//! it with a language model and append the notes to a document.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod global;
pub mod pipeline;
pub mod publish;
pub mod summarize;
pub mod transcript;

pub use error::{NotesError, Result, Upstream};
