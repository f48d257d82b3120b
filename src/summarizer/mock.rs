use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::types::{GenerationRequest, TextGenerator};
use super::SummarizerError;

/// Owned copy of a request seen by [`MockGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub api_key: String,
    pub model: String,
    pub system_instruction: String,
    pub input: String,
    pub temperature: f32,
}

/// Test double backend: returns a fixed outcome and counts invocations.
pub struct MockGenerator {
    outcome: Result<String, SummarizerError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<RecordedRequest>>,
}

impl MockGenerator {
    /// Backend that always answers `response`.
    pub fn new(response: &str) -> Self {
        Self::with_outcome(Ok(response.to_string()))
    }

    /// Backend that always fails with `error`.
    pub fn failing(error: SummarizerError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<String, SummarizerError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of `generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last_request.lock().ok()?.clone()
    }
}

impl TextGenerator for MockGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, SummarizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(RecordedRequest {
                api_key: request.api_key.to_string(),
                model: request.model.to_string(),
                system_instruction: request.system_instruction.to_string(),
                input: request.input.to_string(),
                temperature: request.temperature,
            });
        }
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest<'static> {
        GenerationRequest {
            api_key: "k",
            model: "m",
            system_instruction: "s",
            input: "i",
            temperature: 0.2,
        }
    }

    #[test]
    fn mock_returns_configured_response_and_counts() {
        let mock = MockGenerator::new("test response");
        assert_eq!(mock.call_count(), 0);
        assert_eq!(mock.generate(&request()).unwrap(), "test response");
        assert_eq!(mock.generate(&request()).unwrap(), "test response");
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn mock_records_last_request() {
        let mock = MockGenerator::new("");
        assert!(mock.last_request().is_none());
        mock.generate(&request()).unwrap();
        let recorded = mock.last_request().unwrap();
        assert_eq!(recorded.model, "m");
        assert_eq!(recorded.input, "i");
    }

    #[test]
    fn failing_mock_returns_error() {
        let mock = MockGenerator::failing(SummarizerError::Timeout(60));
        assert_eq!(
            mock.generate(&request()).unwrap_err(),
            SummarizerError::Timeout(60)
        );
        assert_eq!(mock.call_count(), 1);
    }
}
