//! Remote inference providers behind a uniform dispatch seam.
//!
//! Two backends exist — an OpenAI-style chat-completions endpoint and a
//! Gemini-style multimodal generation endpoint. Both take one normalized
//! frame and return one free-text verdict; they differ only in wire format,
//! so the orchestrator sees a single contract.

pub mod chat_vision;
pub mod multimodal;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use luzhanqi_vision::NormalizedImage;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::RefereeResult;

pub use chat_vision::ChatVisionProvider;
pub use multimodal::MultimodalProvider;

/// Referee instructions, sent unchanged as the system/text prompt.
pub const REFEREE_PROMPT: &str = "You act as an independent referee for Chinese military chess (Luzhanqi). Rank comparison: Field Marshal > General > Major General > Brigadier > Colonel > Major > Captain > Lieutenant > Engineer. Take a deep breath and work on this step by step. First you examine the photo carefully and identify their ranks and colors. Compare them and announce the outcome by referring to their color, avoiding mention of position such as left/right. Remember, no talking about the ranks, never! No explanations. There is no other color but a black piece and a red piece.";

/// Output token cap shared by both providers.
pub const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Request timeout for inference and speech calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Bodies carried inside errors are capped so logs stay readable.
const ERROR_BODY_LIMIT: usize = 512;

/// Free-text verdict returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict(String);

impl Verdict {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remote inference backend.
///
/// Single attempt, no retry; a failed call is terminal for the run.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Human-readable provider name for logs and errors.
    fn name(&self) -> &'static str;

    /// Send one inference request for a normalized frame.
    async fn infer(&self, image: &NormalizedImage) -> RefereeResult<Verdict>;
}

/// Build the provider selected by the configuration.
pub fn from_config(config: &ProviderConfig) -> Box<dyn InferenceProvider> {
    match config.kind {
        ProviderKind::ChatVision => Box::new(ChatVisionProvider::new(config)),
        ProviderKind::Multimodal => Box::new(MultimodalProvider::new(config)),
    }
}

pub(crate) fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("falling back to a default HTTP client without a request timeout: {e}");
            reqwest::Client::default()
        })
}

/// Truncate a response body for inclusion in an error, respecting UTF-8
/// boundaries.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        // Just verify construction doesn't panic or hit the fallback path.
        let _client = build_http_client();
    }

    #[test]
    fn test_verdict_display() {
        let verdict = Verdict::new("black");
        assert_eq!(verdict.to_string(), "black");
        assert_eq!(verdict.as_str(), "black");
    }

    #[test]
    fn test_truncate_body_short() {
        assert_eq!(truncate_body("ok"), "ok");
    }

    #[test]
    fn test_truncate_body_long() {
        let body = "x".repeat(2000);
        let out = truncate_body(&body);
        assert!(out.len() < body.len());
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_body_multibyte_boundary() {
        let body = "黑".repeat(400); // 3 bytes each, forces a mid-char cap
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_prompt_names_both_colors_only() {
        assert!(REFEREE_PROMPT.contains("black piece"));
        assert!(REFEREE_PROMPT.contains("red piece"));
        assert!(REFEREE_PROMPT.contains("Field Marshal > General"));
    }
}
