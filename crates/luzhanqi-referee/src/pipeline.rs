//! Pipeline orchestration: normalize, infer, optionally speak.

use std::sync::atomic::{AtomicU64, Ordering};

use luzhanqi_vision::{normalize, RawFrame};

use crate::error::{RefereeError, RefereeResult};
use crate::provider::{InferenceProvider, Verdict};
use crate::speech::VoiceResponder;

/// Sequencing glue for one capture-to-verdict flow.
///
/// Stages run strictly in order and short-circuit on failure, except the
/// voice responder: by the time speech runs the verdict exists, so audio
/// failure is logged and the verdict still returned.
///
/// Runs take a ticket from a monotonic counter; a run that finishes after a
/// newer one has started fails with [`RefereeError::Superseded`] instead of
/// delivering a stale verdict. Rapid repeated captures therefore resolve to
/// the newest frame.
pub struct Pipeline {
    provider: Box<dyn InferenceProvider>,
    responder: Option<VoiceResponder>,
    latest: AtomicU64,
}

impl Pipeline {
    pub fn new(provider: Box<dyn InferenceProvider>, responder: Option<VoiceResponder>) -> Self {
        Self {
            provider,
            responder,
            latest: AtomicU64::new(0),
        }
    }

    /// Run the full pipeline on one frame.
    pub async fn run(&self, frame: &RawFrame) -> RefereeResult<Verdict> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let normalized = normalize(frame)?;
        tracing::debug!(
            "run {ticket}: normalized {}x{} frame",
            frame.dimensions().0,
            frame.dimensions().1
        );

        let verdict = self.provider.infer(&normalized).await?;

        // A newer capture started while inference was in flight; its verdict
        // wins.
        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::info!("run {ticket}: discarding superseded verdict");
            return Err(RefereeError::Superseded);
        }

        tracing::info!("run {ticket}: {} verdict: {verdict}", self.provider.name());

        if let Some(responder) = &self.responder {
            if let Err(e) = responder.speak(&verdict).await {
                tracing::warn!("run {ticket}: voice responder failed: {e}");
            }
        }

        Ok(verdict)
    }
}
