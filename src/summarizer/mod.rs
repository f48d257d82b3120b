//! Summarization client: the only path from the views to the external
//! text-generation backend.
//!
//! `Summarizer::summarize` returns a typed `Result`; display text is produced
//! at the render boundary by [`Reply::from_result`].

pub mod client;
pub mod gemini;
pub mod mock;
pub mod prompt;
pub mod types;

pub use client::*;
pub use gemini::*;
pub use mock::*;
pub use prompt::*;
pub use types::*;

pub use crate::models::ReplyKind;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizerError {
    #[error("Backend credential is not configured")]
    Configuration,

    #[error("Text-generation backend is unreachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Backend returned error (status {status}): {body}")]
    Backend { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Backend response contained no text")]
    EmptyResponse,
}

impl SummarizerError {
    /// Missing credential, as opposed to a failed backend call.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration)
    }

    /// Which display category this error belongs to.
    pub fn reply_kind(&self) -> ReplyKind {
        if self.is_configuration() {
            ReplyKind::ConfigurationError
        } else {
            ReplyKind::BackendError
        }
    }
}
