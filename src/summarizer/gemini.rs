use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{GenerationRequest, TextGenerator};
use super::SummarizerError;

/// Public Generative Language API endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Blocking HTTP client for the `generateContent` endpoint.
///
/// Must be constructed and used outside an async context (the API layer
/// calls it from `spawn_blocking`).
pub struct GeminiClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, SummarizerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| SummarizerError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_content_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn build_request_body<'a>(request: &GenerationRequest<'a>) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: request.input,
            }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: request.system_instruction,
            }],
        },
        generation_config: GenerationConfig {
            temperature: request.temperature,
        },
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_generate_content_response(raw: &str) -> Result<String, SummarizerError> {
    let parsed: GenerateContentResponse = serde_json::from_str(raw)
        .map_err(|e| SummarizerError::ResponseParsing(e.to_string()))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(SummarizerError::EmptyResponse);
    }
    Ok(text)
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, SummarizerError> {
        let url = self.generate_content_url(request.model);
        let body = build_request_body(request);

        // Credential goes in a header so it never shows up in URLs or error text.
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", request.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    SummarizerError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    SummarizerError::Timeout(self.timeout_secs)
                } else {
                    SummarizerError::HttpClient(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummarizerError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response
            .text()
            .map_err(|e| SummarizerError::ResponseParsing(e.without_url().to_string()))?;
        parse_generate_content_response(&raw)
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;

    fn request() -> GenerationRequest<'static> {
        GenerationRequest {
            api_key: "secret",
            model: DEFAULT_MODEL,
            system_instruction: "Be careful.",
            input: "Context Data:\nx\n\nUser Query:\ny",
            temperature: 0.2,
        }
    }

    #[test]
    fn client_constructor() {
        let client = GeminiClient::new("https://example.test/v1beta", 30).unwrap();
        assert_eq!(client.base_url(), "https://example.test/v1beta");
        assert_eq!(client.timeout_secs, 30);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = GeminiClient::new("https://example.test/v1beta/", 30).unwrap();
        assert_eq!(client.base_url(), "https://example.test/v1beta");
    }

    #[test]
    fn url_targets_model() {
        let client = GeminiClient::new(DEFAULT_API_BASE, 30).unwrap();
        assert_eq!(
            client.generate_content_url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let json = serde_json::to_value(build_request_body(&request())).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "Context Data:\nx\n\nUser Query:\ny"
        );
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be careful.");
        assert!(json["systemInstruction"].get("role").is_none());
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
        // The credential is never part of the body.
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn parse_joins_text_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"BP "},{"text":"normal"}]}}]}"#;
        assert_eq!(parse_generate_content_response(raw).unwrap(), "BP normal");
    }

    #[test]
    fn parse_uses_first_candidate_only() {
        let raw = r#"{"candidates":[
            {"content":{"parts":[{"text":"first"}]}},
            {"content":{"parts":[{"text":"second"}]}}
        ]}"#;
        assert_eq!(parse_generate_content_response(raw).unwrap(), "first");
    }

    #[test]
    fn parse_without_candidates_is_empty_response() {
        assert_eq!(
            parse_generate_content_response(r#"{"candidates":[]}"#).unwrap_err(),
            SummarizerError::EmptyResponse
        );
        assert_eq!(
            parse_generate_content_response("{}").unwrap_err(),
            SummarizerError::EmptyResponse
        );
    }

    #[test]
    fn parse_malformed_json() {
        let err = parse_generate_content_response("not json").unwrap_err();
        assert!(matches!(err, SummarizerError::ResponseParsing(_)));
    }

    #[test]
    fn unreachable_backend_maps_to_connection_error() {
        // Bind then drop to get a local port with nothing listening.
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let base = format!("http://{addr}");
        let client = GeminiClient::new(&base, 5).unwrap();
        let err = client.generate(&request()).unwrap_err();
        assert_eq!(err, SummarizerError::Connection(base));
    }

    #[test]
    fn silent_backend_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });

        let client = GeminiClient::new(&format!("http://{addr}"), 1).unwrap();
        let started = Instant::now();
        let err = client.generate(&request()).unwrap_err();
        assert_eq!(err, SummarizerError::Timeout(1));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
