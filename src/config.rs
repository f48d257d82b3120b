use std::net::SocketAddr;

use crate::summarizer::{SummarizerConfig, DEFAULT_API_BASE, DEFAULT_MODEL};

/// Application-level constants
pub const APP_NAME: &str = "SCHOA";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend credential.
pub const ENV_API_KEY: &str = "SCHOA_API_KEY";
/// Accepted when `SCHOA_API_KEY` is unset.
pub const ENV_API_KEY_FALLBACK: &str = "API_KEY";
pub const ENV_MODEL: &str = "SCHOA_MODEL";
pub const ENV_API_BASE: &str = "SCHOA_API_BASE";
pub const ENV_REQUEST_TIMEOUT: &str = "SCHOA_REQUEST_TIMEOUT_SECS";
pub const ENV_BIND_ADDR: &str = "SCHOA_BIND_ADDR";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "schoa_lib=info,schoa=info,tower_http=warn"
}

/// Startup configuration, resolved once from the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup. Unparseable values fall back to
    /// defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .or_else(|| lookup(ENV_API_KEY_FALLBACK))
            .filter(|k| !k.trim().is_empty());

        let model = lookup(ENV_MODEL)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_base = lookup(ENV_API_BASE)
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let request_timeout_secs = match lookup(ENV_REQUEST_TIMEOUT) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "Invalid {ENV_REQUEST_TIMEOUT}, using {DEFAULT_REQUEST_TIMEOUT_SECS}s"
                    );
                    DEFAULT_REQUEST_TIMEOUT_SECS
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let default_addr = SocketAddr::from(([127, 0, 0, 1], 8080));
        let bind_addr = match lookup(ENV_BIND_ADDR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid {ENV_BIND_ADDR}, using {DEFAULT_BIND_ADDR}");
                default_addr
            }),
            None => default_addr,
        };

        Self {
            api_key,
            model,
            api_base,
            request_timeout_secs,
            bind_addr,
        }
    }

    pub fn summarizer_config(&self) -> SummarizerConfig {
        SummarizerConfig::new(self.api_key.clone(), &self.model)
    }
}
