//! Provider selection and credential resolution.

pub mod store;

use crate::error::{RefereeError, RefereeResult};
use store::{CredentialStore, GEMINI_KEY_ID, OPENAI_KEY_ID};

/// Default OpenAI-compatible API base.
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com";

/// Default Gemini API base.
pub const DEFAULT_GEMINI_BASE: &str = "https://generativelanguage.googleapis.com";

/// Which remote inference backend is active. Exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderKind {
    /// OpenAI-style chat-completions endpoint with an inline image data URL.
    ChatVision,
    /// Gemini-style native multimodal generation endpoint.
    Multimodal,
}

/// Read-only provider configuration handed into the pipeline.
///
/// Owned by the application shell; the core never reaches into ambient
/// state to look up keys. Both credentials are carried because speech
/// synthesis always uses the OpenAI key, even when the active inference
/// provider is Gemini.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub openai_key: Option<String>,
    pub gemini_key: Option<String>,
    pub openai_base: String,
    pub gemini_base: String,
}

impl ProviderConfig {
    /// Create a configuration with default endpoints and no credentials.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            openai_key: None,
            gemini_key: None,
            openai_base: DEFAULT_OPENAI_BASE.to_string(),
            gemini_base: DEFAULT_GEMINI_BASE.to_string(),
        }
    }

    /// Resolve credentials for a provider kind.
    ///
    /// Environment variables take precedence over the stored keys, mirroring
    /// the usual flag > env > file order.
    pub fn resolve(kind: ProviderKind, store: &dyn CredentialStore) -> Self {
        let openai_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .or_else(|| store.get(OPENAI_KEY_ID));
        let gemini_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| store.get(GEMINI_KEY_ID));

        Self {
            openai_key,
            gemini_key,
            ..Self::new(kind)
        }
    }

    /// Credential for the active inference provider.
    ///
    /// A request is only dispatched if a non-empty credential exists.
    pub fn credential(&self) -> RefereeResult<&str> {
        match self.kind {
            ProviderKind::ChatVision => non_empty(&self.openai_key, "OpenAI"),
            ProviderKind::Multimodal => non_empty(&self.gemini_key, "Gemini"),
        }
    }

    /// Credential for speech synthesis. Always the OpenAI key.
    pub fn speech_credential(&self) -> RefereeResult<&str> {
        non_empty(&self.openai_key, "OpenAI")
    }

    /// Point the OpenAI-compatible endpoints at a different base URL.
    pub fn with_openai_base(mut self, base: &str) -> Self {
        self.openai_base = base.trim_end_matches('/').to_string();
        self
    }

    /// Point the Gemini endpoint at a different base URL.
    pub fn with_gemini_base(mut self, base: &str) -> Self {
        self.gemini_base = base.trim_end_matches('/').to_string();
        self
    }
}

fn non_empty<'a>(key: &'a Option<String>, provider: &'static str) -> RefereeResult<&'a str> {
    key.as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(RefereeError::MissingCredential(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_missing() {
        let config = ProviderConfig::new(ProviderKind::ChatVision);
        assert!(matches!(
            config.credential(),
            Err(RefereeError::MissingCredential("OpenAI"))
        ));
    }

    #[test]
    fn test_credential_empty_counts_as_missing() {
        let mut config = ProviderConfig::new(ProviderKind::Multimodal);
        config.gemini_key = Some(String::new());
        assert!(matches!(
            config.credential(),
            Err(RefereeError::MissingCredential("Gemini"))
        ));
    }

    #[test]
    fn test_credential_present() {
        let mut config = ProviderConfig::new(ProviderKind::ChatVision);
        config.openai_key = Some("sk-test".to_string());
        assert_eq!(config.credential().unwrap(), "sk-test");
    }

    #[test]
    fn test_speech_uses_openai_key_under_gemini() {
        let mut config = ProviderConfig::new(ProviderKind::Multimodal);
        config.gemini_key = Some("gm-test".to_string());
        assert!(matches!(
            config.speech_credential(),
            Err(RefereeError::MissingCredential("OpenAI"))
        ));

        config.openai_key = Some("sk-test".to_string());
        assert_eq!(config.speech_credential().unwrap(), "sk-test");
    }

    #[test]
    fn test_base_override_strips_trailing_slash() {
        let config =
            ProviderConfig::new(ProviderKind::ChatVision).with_openai_base("http://localhost:9999/");
        assert_eq!(config.openai_base, "http://localhost:9999");
    }
}
