use super::SummarizerError;

/// One generation call, vendor-neutral.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub system_instruction: &'a str,
    pub input: &'a str,
    pub temperature: f32,
}

/// Text-generation backend abstraction (allows test doubles).
///
/// Implementations issue exactly one call per `generate` and never retry.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, SummarizerError>;
}
