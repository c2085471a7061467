//! Message definitions for communication between the control thread, the audio thread and
//! the background loader.
//!
//! [`ControlMessage`] and [`AudioMessage`] are the wire format of the ring buffers between
//! the engine and the real-time callback. [`LoaderEvent`] travels from decode threads back
//! to the engine, which turns the ones that still matter into [`EngineEvent`]s.

use std::sync::Arc;

use crate::audio_engine::errors::DecodeError;
use crate::audio_engine::filter_chain::{FilterChain, FrequencyRange};
use crate::audio_engine::session::PlaybackSession;

/// Decoded, immutable audio already matched to the output's channel count and sample rate.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub channels: usize,
    pub sample_rate: u32,
    pub samples: Arc<[f32]>,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Message that is emitted from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    /// The session played to its last frame and was dropped.
    SessionEnded { session_id: u64 },
}

/// Message that is emitted from the control thread.
pub enum ControlMessage {
    /// Hand the audio thread its filter chain. Sent once per engine.
    InstallFilterChain(Box<FilterChain>),

    /// Start streaming a new session through the chain.
    StartSession(PlaybackSession),

    /// Stop and drop the session with this id, if it is still the active one.
    StopSession { session_id: u64 },

    /// Retarget all filter stages.
    SetFrequencyRange(FrequencyRange),
}

/// Events emitted from a background decode.
#[derive(Debug)]
pub enum LoaderEvent {
    /// Decoding started for the given load.
    Started { load_id: u64 },

    /// A progress update.
    ///
    /// - `percent` is the best-effort *total* progress across the full load pipeline (0.0..=1.0).
    /// - `stage` is a human-readable stage string (e.g. "Loading (decoding)").
    Progress {
        load_id: u64,
        percent: f32,
        stage: String,
    },

    /// Decoding completed successfully.
    Success { load_id: u64, audio: DecodedAudio },

    /// Decoding failed.
    Error { load_id: u64, error: DecodeError },
}

/// Notifications the engine hands to its caller.
#[derive(Debug)]
pub enum EngineEvent {
    LoadProgress { percent: f32, stage: String },

    /// The buffer is ready to play.
    Loaded { duration: f64 },

    /// The last load could not be decoded; the engine is unloaded.
    LoadFailed(DecodeError),

    /// Playback reached the end of the track.
    Ended,
}
