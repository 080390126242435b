//! Audio decode validation and the rodio-backed playback sink.

use std::io::Cursor;
use std::sync::mpsc::{self, Sender};

use crate::error::{RefereeError, RefereeResult};

use super::SpeechAudio;

/// Playback target for synthesized audio.
///
/// At most one playback session is active; starting a new one stops any
/// prior session first.
pub trait AudioSink: Send + Sync {
    /// Begin playback. Returns once playback has been handed off, not when
    /// the audio finishes.
    fn play(&self, audio: SpeechAudio) -> RefereeResult<()>;
}

/// Sink that accepts and discards audio. Used when no output device exists
/// (headless runs, tests).
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&self, _audio: SpeechAudio) -> RefereeResult<()> {
        Ok(())
    }
}

/// Decode-check an audio payload without touching an output device.
pub fn validate(audio: &SpeechAudio) -> RefereeResult<()> {
    rodio::Decoder::new(Cursor::new(audio.as_bytes().to_vec()))
        .map(|_| ())
        .map_err(|e| RefereeError::AudioPlayback(format!("undecodable audio payload: {e}")))
}

/// Sink backed by a dedicated thread that owns the output device.
///
/// The thread holds the single playback slot: a new request stops the
/// previous `rodio::Sink` before appending the next one, so rapid verdicts
/// never overlap audibly.
pub struct RodioSink {
    tx: Sender<Vec<u8>>,
}

impl RodioSink {
    /// Spawn the playback thread. Fails if no output device is available.
    pub fn spawn() -> RefereeResult<Self> {
        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        std::thread::Builder::new()
            .name("audio-playback".to_string())
            .spawn(move || {
                let (_stream, handle) = match rodio::OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = ready_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(format!("{e}")));
                        return;
                    }
                };

                let mut current: Option<rodio::Sink> = None;
                while let Ok(bytes) = rx.recv() {
                    if let Some(prev) = current.take() {
                        prev.stop();
                    }
                    let decoder = match rodio::Decoder::new(Cursor::new(bytes)) {
                        Ok(d) => d,
                        Err(e) => {
                            tracing::warn!("dropping undecodable audio payload: {e}");
                            continue;
                        }
                    };
                    match rodio::Sink::try_new(&handle) {
                        Ok(sink) => {
                            sink.append(decoder);
                            current = Some(sink);
                        }
                        Err(e) => tracing::warn!("failed to open playback sink: {e}"),
                    }
                }
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { tx }),
            Ok(Err(e)) => Err(RefereeError::AudioPlayback(format!(
                "no audio output device: {e}"
            ))),
            Err(_) => Err(RefereeError::AudioPlayback(
                "playback thread exited before initializing".to_string(),
            )),
        }
    }
}

impl AudioSink for RodioSink {
    fn play(&self, audio: SpeechAudio) -> RefereeResult<()> {
        self.tx
            .send(audio.into_bytes())
            .map_err(|_| RefereeError::AudioPlayback("playback thread is gone".to_string()))
    }
}
