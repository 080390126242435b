//! Verdict speech synthesis and playback.
//!
//! Synthesize-then-play, internally sequential. The orchestrator treats any
//! failure here as non-fatal; the text verdict is the primary success
//! condition.

pub mod playback;

use serde_json::json;

use crate::config::ProviderConfig;
use crate::error::{RefereeError, RefereeResult};
use crate::provider::{build_http_client, truncate_body, Verdict};

pub use playback::{AudioSink, NullSink, RodioSink};

const TTS_MODEL: &str = "tts-1";
const TTS_VOICE: &str = "alloy";

/// Raw encoded audio bytes returned by the synthesis endpoint. Ephemeral;
/// consumed by playback and discarded.
pub struct SpeechAudio(Vec<u8>);

impl SpeechAudio {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Synthesize-then-play responder for verdicts.
///
/// Speech always rides on the OpenAI credential, regardless of which
/// inference provider produced the verdict.
pub struct VoiceResponder {
    client: reqwest::Client,
    config: ProviderConfig,
    sink: Box<dyn AudioSink>,
}

impl VoiceResponder {
    pub fn new(config: &ProviderConfig, sink: Box<dyn AudioSink>) -> Self {
        Self {
            client: build_http_client(),
            config: config.clone(),
            sink,
        }
    }

    /// Synthesize the verdict and start playback.
    ///
    /// The payload is decode-checked before it reaches the sink so a bad
    /// response fails here with [`RefereeError::AudioPlayback`] instead of
    /// dying silently on the playback thread.
    pub async fn speak(&self, verdict: &Verdict) -> RefereeResult<()> {
        let audio = self.synthesize(verdict.as_str()).await?;
        playback::validate(&audio)?;
        self.sink.play(audio)
    }

    async fn synthesize(&self, text: &str) -> RefereeResult<SpeechAudio> {
        let key = self.config.speech_credential()?;

        let resp = self
            .client
            .post(format!("{}/v1/audio/speech", self.config.openai_base))
            .bearer_auth(key)
            .json(&json!({
                "model": TTS_MODEL,
                "input": text,
                "voice": TTS_VOICE,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RefereeError::Provider {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let bytes = resp.bytes().await?;
        tracing::debug!("synthesized {} bytes of speech", bytes.len());
        Ok(SpeechAudio::new(bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_audio_accessors() {
        let audio = SpeechAudio::new(vec![1, 2, 3]);
        assert_eq!(audio.as_bytes(), &[1, 2, 3]);
        assert_eq!(audio.into_bytes(), vec![1, 2, 3]);
    }
}
