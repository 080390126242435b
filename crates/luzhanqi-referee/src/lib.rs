//! Luzhanqi referee — capture-to-verdict pipeline over remote vision models.
//!
//! One frame of two game pieces goes in; a normalized 512×512 square is sent
//! to the configured inference provider with the fixed referee prompt; the
//! free-text verdict comes back and is optionally spoken aloud.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod speech;

pub use config::{ProviderConfig, ProviderKind};
pub use error::{RefereeError, RefereeResult};
pub use pipeline::Pipeline;
pub use provider::{InferenceProvider, Verdict, REFEREE_PROMPT};
pub use speech::VoiceResponder;
