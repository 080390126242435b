//! Gemini-style native multimodal provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use luzhanqi_vision::NormalizedImage;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{RefereeError, RefereeResult};

use super::{
    build_http_client, truncate_body, InferenceProvider, Verdict, MAX_OUTPUT_TOKENS, REFEREE_PROMPT,
};

const MULTIMODAL_MODEL: &str = "gemini-pro-vision";

/// Provider speaking the Gemini generateContent wire format with inline
/// JPEG data.
pub struct MultimodalProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl MultimodalProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: build_http_client(),
            // This provider always dispatches on the Gemini credential,
            // whatever active kind the caller's config carries.
            config: ProviderConfig {
                kind: ProviderKind::Multimodal,
                ..config.clone()
            },
        }
    }

    fn request_body(image: &NormalizedImage) -> RefereeResult<Value> {
        let data = luzhanqi_vision::to_base64_jpeg(image)?;
        Ok(json!({
            "contents": [
                {
                    "parts": [
                        { "text": REFEREE_PROMPT },
                        { "inline_data": { "mime_type": "image/jpeg", "data": data } }
                    ]
                }
            ],
            "generationConfig": { "maxOutputTokens": MAX_OUTPUT_TOKENS },
        }))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl InferenceProvider for MultimodalProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn infer(&self, image: &NormalizedImage) -> RefereeResult<Verdict> {
        let key = self.config.credential()?;

        let body = Self::request_body(image)?;

        // The credential travels as a query parameter on this API; keep it
        // out of logged URLs.
        let resp = self
            .client
            .post(format!(
                "{}/v1beta/models/{MULTIMODAL_MODEL}:generateContent",
                self.config.gemini_base
            ))
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(RefereeError::Provider {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| RefereeError::MalformedResponse {
                context: format!("generate response: {e}"),
                body: truncate_body(&text),
            })?;

        // First text part of the first candidate, the same field the SDK
        // surfaces as `response.text`.
        let content = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.text.clone()))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RefereeError::MalformedResponse {
                context: "generate response has no text part".to_string(),
                body: truncate_body(&text),
            })?;

        tracing::debug!("multimodal verdict: {content}");
        Ok(Verdict::new(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use luzhanqi_vision::NORMALIZED_EDGE;

    fn normalized() -> NormalizedImage {
        NormalizedImage::new(RgbImage::new(NORMALIZED_EDGE, NORMALIZED_EDGE)).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = MultimodalProvider::request_body(&normalized()).unwrap();

        assert_eq!(body["generationConfig"]["maxOutputTokens"], MAX_OUTPUT_TOKENS);
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], REFEREE_PROMPT);
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert!(parts[1]["inline_data"]["data"].as_str().unwrap().len() > 100);
    }

    #[test]
    fn test_response_parse_first_text_part() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"red"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text.as_deref(), Some("red"));
    }

    #[test]
    fn test_response_parse_requires_candidates() {
        assert!(serde_json::from_str::<GenerateResponse>(r#"{"promptFeedback":{}}"#).is_err());
    }
}
