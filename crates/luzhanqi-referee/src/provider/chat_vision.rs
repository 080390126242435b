//! OpenAI-style chat-completions vision provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use luzhanqi_vision::NormalizedImage;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{RefereeError, RefereeResult};

use super::{
    build_http_client, truncate_body, InferenceProvider, Verdict, MAX_OUTPUT_TOKENS, REFEREE_PROMPT,
};

const CHAT_MODEL: &str = "gpt-4-vision-preview";

/// Image detail hint; low keeps the token cost of the 512×512 frame flat.
const IMAGE_DETAIL: &str = "low";

/// Provider speaking the chat-completions wire format with an inline
/// base64 JPEG data URL.
pub struct ChatVisionProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl ChatVisionProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: build_http_client(),
            // This provider always dispatches on the OpenAI credential,
            // whatever active kind the caller's config carries.
            config: ProviderConfig {
                kind: ProviderKind::ChatVision,
                ..config.clone()
            },
        }
    }

    fn request_body(image: &NormalizedImage) -> RefereeResult<Value> {
        let data_url = luzhanqi_vision::to_data_url(image)?;
        Ok(json!({
            "model": CHAT_MODEL,
            "messages": [
                { "role": "system", "content": REFEREE_PROMPT },
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": { "url": data_url, "detail": IMAGE_DETAIL }
                        }
                    ]
                }
            ],
            "max_tokens": MAX_OUTPUT_TOKENS,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl InferenceProvider for ChatVisionProvider {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    async fn infer(&self, image: &NormalizedImage) -> RefereeResult<Verdict> {
        let key = self.config.credential()?;

        let body = Self::request_body(image)?;

        let resp = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.openai_base))
            .bearer_auth(key)
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

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| RefereeError::MalformedResponse {
                context: format!("chat response: {e}"),
                body: truncate_body(&text),
            })?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| RefereeError::MalformedResponse {
                context: "chat response has no usable choice".to_string(),
                body: truncate_body(&text),
            })?;

        tracing::debug!("chat-vision verdict: {content}");
        Ok(Verdict::new(content))
    }
}
