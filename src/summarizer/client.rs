use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::prompt::{build_input, DEFAULT_TEMPERATURE, SYSTEM_INSTRUCTION};
use super::types::{GenerationRequest, TextGenerator};
use super::{ReplyKind, SummarizerError};
use crate::config;

/// Shown when the backend call fails for any reason. Detail goes to the log only.
pub const BACKEND_FAILURE_MESSAGE: &str =
    "Error generating response. Please check your API key and connection.";

/// Replaces a blank backend answer.
pub const EMPTY_REPLY_MESSAGE: &str = "I encountered an error processing that request.";

/// Backend settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// `None` or blank means no backend call is ever attempted.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
}

impl SummarizerConfig {
    pub fn new(api_key: Option<String>, model: &str) -> Self {
        Self {
            api_key,
            model: model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Credential present and non-blank.
    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Single entry point to the text-generation backend.
///
/// Each call issues at most one backend request. Nothing is cached and
/// identical requests are not deduplicated.
pub struct Summarizer {
    config: SummarizerConfig,
    backend: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(config: SummarizerConfig, backend: Arc<dyn TextGenerator>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Send `{context, query}` to the backend and return its text verbatim.
    ///
    /// Fails with [`SummarizerError::Configuration`] before any I/O when the
    /// credential is missing. Backend failures are logged here with full detail.
    pub fn summarize(&self, context: &str, query: &str) -> Result<String, SummarizerError> {
        let Some(api_key) = self.config.credential() else {
            tracing::warn!(
                "Summarization requested but no credential is configured (set {})",
                config::ENV_API_KEY
            );
            return Err(SummarizerError::Configuration);
        };

        let input = build_input(context, query);
        let request = GenerationRequest {
            api_key,
            model: &self.config.model,
            system_instruction: SYSTEM_INSTRUCTION,
            input: &input,
            temperature: self.config.temperature,
        };

        let started = Instant::now();
        match self.backend.generate(&request) {
            Ok(text) => {
                tracing::debug!(
                    model = %self.config.model,
                    context_bytes = context.len(),
                    response_bytes = text.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Summarization succeeded"
                );
                Ok(text)
            }
            Err(e) => {
                tracing::error!(
                    model = %self.config.model,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Summarization backend call failed"
                );
                Err(e)
            }
        }
    }

    /// [`Self::summarize`] converted to displayable text.
    pub fn reply(&self, context: &str, query: &str) -> Reply {
        Reply::from_result(self.summarize(context, query))
    }
}

/// Displayable outcome of a summarization call.
///
/// `kind` lets a view style failures differently from real answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
}

impl Reply {
    pub fn answer(text: String) -> Self {
        Self {
            text,
            kind: ReplyKind::Answer,
        }
    }

    /// Render boundary: never exposes backend error detail.
    pub fn from_result(result: Result<String, SummarizerError>) -> Self {
        match result {
            Ok(text) => Self::answer(text).non_blank(),
            Err(e) => Self {
                text: display_message(&e),
                kind: e.reply_kind(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind != ReplyKind::Answer
    }

    /// A whitespace-only answer becomes a backend failure with
    /// [`EMPTY_REPLY_MESSAGE`]. Other replies pass through.
    pub fn non_blank(self) -> Self {
        if self.text.trim().is_empty() {
            Self {
                text: EMPTY_REPLY_MESSAGE.to_string(),
                kind: ReplyKind::BackendError,
            }
        } else {
            self
        }
    }
}

/// User-facing text for a summarization failure.
pub fn display_message(error: &SummarizerError) -> String {
    if error.is_configuration() {
        format!(
            "The AI assistant is not configured. Set the {} environment variable and restart the service.",
            config::ENV_API_KEY
        )
    } else {
        BACKEND_FAILURE_MESSAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::MockGenerator;

    fn summarizer_with(api_key: Option<&str>, mock: &Arc<MockGenerator>) -> Summarizer {
        Summarizer::new(
            SummarizerConfig::new(api_key.map(String::from), "test-model"),
            mock.clone(),
        )
    }

    #[test]
    fn missing_credential_is_configuration_error_without_backend_call() {
        let mock = Arc::new(MockGenerator::new("should not be returned"));
        let summarizer = summarizer_with(None, &mock);

        let err = summarizer.summarize("ctx", "hello").unwrap_err();
        assert_eq!(err, SummarizerError::Configuration);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let mock = Arc::new(MockGenerator::new("x"));
        for key in ["", "   "] {
            let summarizer = summarizer_with(Some(key), &mock);
            assert!(!summarizer.config().has_credential());
            assert!(summarizer.summarize("ctx", "q").unwrap_err().is_configuration());
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn missing_credential_reply_is_actionable() {
        let mock = Arc::new(MockGenerator::new("x"));
        let reply = summarizer_with(None, &mock).reply("ctx", "hello");
        assert_eq!(reply.kind, ReplyKind::ConfigurationError);
        assert!(reply.text.contains(config::ENV_API_KEY));
        assert_ne!(reply.text, BACKEND_FAILURE_MESSAGE);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn success_returns_backend_text_verbatim() {
        let mock = Arc::new(MockGenerator::new("X"));
        let summarizer = summarizer_with(Some("key"), &mock);

        let context = String::from("ctx");
        let query = String::from("hello");
        assert_eq!(summarizer.summarize(&context, &query).unwrap(), "X");
        assert_eq!(context, "ctx");
        assert_eq!(query, "hello");
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn request_carries_configuration_and_input() {
        let mock = Arc::new(MockGenerator::new("ok"));
        let summarizer = summarizer_with(Some("key-123"), &mock);
        summarizer.summarize("ctx", "hello").unwrap();

        let recorded = mock.last_request().unwrap();
        assert_eq!(recorded.api_key, "key-123");
        assert_eq!(recorded.model, "test-model");
        assert_eq!(recorded.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(recorded.input, "Context Data:\nctx\n\nUser Query:\nhello");
        assert!((recorded.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn identical_requests_are_not_deduplicated() {
        let mock = Arc::new(MockGenerator::new("same"));
        let summarizer = summarizer_with(Some("key"), &mock);
        summarizer.summarize("ctx", "q").unwrap();
        summarizer.summarize("ctx", "q").unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn backend_failure_returns_typed_error() {
        let mock = Arc::new(MockGenerator::failing(SummarizerError::Backend {
            status: 500,
            body: "internal stack trace".into(),
        }));
        let summarizer = summarizer_with(Some("key"), &mock);
        let err = summarizer.summarize("ctx", "q").unwrap_err();
        assert!(!err.is_configuration());
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn backend_failure_reply_is_generic_fallback() {
        let mock = Arc::new(MockGenerator::failing(SummarizerError::Backend {
            status: 500,
            body: "internal stack trace".into(),
        }));
        let reply = summarizer_with(Some("key"), &mock).reply("ctx", "q");
        assert!(!reply.text.is_empty());
        assert_eq!(reply.text, BACKEND_FAILURE_MESSAGE);
        assert_eq!(reply.kind, ReplyKind::BackendError);
        assert!(!reply.text.contains("stack trace"));
        assert!(reply.is_error());
    }

    #[test]
    fn timeout_maps_to_backend_error_reply() {
        let mock = Arc::new(MockGenerator::failing(SummarizerError::Timeout(60)));
        let reply = summarizer_with(Some("key"), &mock).reply("ctx", "q");
        assert_eq!(reply.kind, ReplyKind::BackendError);
        assert_eq!(reply.text, BACKEND_FAILURE_MESSAGE);
    }

    #[test]
    fn answer_reply_is_not_error() {
        let reply = Reply::from_result(Ok("fine".into()));
        assert_eq!(reply, Reply::answer("fine".into()));
        assert!(!reply.is_error());
    }

    #[test]
    fn blank_answer_becomes_backend_error() {
        let reply = Reply::from_result(Ok(" \n\t ".into()));
        assert_eq!(reply.text, EMPTY_REPLY_MESSAGE);
        assert_eq!(reply.kind, ReplyKind::BackendError);
        assert!(reply.is_error());

        let failure = Reply::from_result(Err(SummarizerError::Configuration));
        assert_eq!(failure.clone().non_blank(), failure);
    }

    #[test]
    fn reply_serializes_kind_snake_case() {
        let json = serde_json::to_value(Reply::from_result(Err(SummarizerError::Configuration)))
            .unwrap();
        assert_eq!(json["kind"], "configuration_error");
    }
}
