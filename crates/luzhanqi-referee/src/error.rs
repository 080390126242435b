//! Error taxonomy for the referee pipeline.

/// All errors that can occur across a pipeline run.
///
/// Stages surface these to the orchestrator rather than handling them
/// internally; only audio failures are downgraded there (the verdict has
/// already been obtained by the time speech runs).
#[derive(thiserror::Error, Debug)]
pub enum RefereeError {
    #[error("Vision error: {0}")]
    Vision(#[from] luzhanqi_vision::VisionError),

    #[error("Missing credential for {0}")]
    MissingCredential(&'static str),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed response ({context}): {body}")]
    MalformedResponse { context: String, body: String },

    #[error("Audio playback error: {0}")]
    AudioPlayback(String),

    #[error("Superseded by a newer capture")]
    Superseded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type RefereeResult<T> = Result<T, RefereeError>;
