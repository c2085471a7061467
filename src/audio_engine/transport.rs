//! Transport state: engine states, the audio clock, elapsed-time bookkeeping and the
//! position-update loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Lifecycle of an [`AudioEngine`](crate::audio_engine::AudioEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unloaded,
    Decoding,
    Ready,
    Playing,
}

/// Monotonic clock advanced by the output as it renders frames.
///
/// Shared between the audio thread (writer) and the engine (reader).
#[derive(Debug, Clone)]
pub struct AudioClock {
    frames: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    sample_rate: u32,
}

impl AudioClock {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            running: Arc::new(AtomicBool::new(true)),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn now_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::AcqRel);
    }

    /// `false` once the output stopped advancing the clock (stream error).
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }
}

/// Elapsed-time bookkeeping for one loaded track.
///
/// While a session runs, elapsed = `now - start_reference`; on pause the elapsed time is
/// frozen into `resume_offset`. Elapsed is always clamped to `[0, duration]`.
#[derive(Debug, Clone, Default)]
pub struct TransportClock {
    duration: f64,
    resume_offset: f64,
    start_reference: Option<f64>,
}

impl TransportClock {
    /// Forgets all state for a new track.
    pub fn reset(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
        self.resume_offset = 0.0;
        self.start_reference = None;
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn resume_offset(&self) -> f64 {
        self.resume_offset
    }

    pub fn is_running(&self) -> bool {
        self.start_reference.is_some()
    }

    /// Starts counting so that elapsed time equals the resume offset at `now`.
    pub fn start(&mut self, now: f64) {
        self.start_reference = Some(now - self.resume_offset);
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        match self.start_reference {
            Some(start) => (now - start).clamp(0.0, self.duration),
            None => self.resume_offset,
        }
    }

    /// Stops counting and keeps the elapsed time as the new resume offset.
    pub fn freeze(&mut self, now: f64) {
        self.resume_offset = self.elapsed(now);
        self.start_reference = None;
    }

    /// Stops counting at the end of the track.
    pub fn finish(&mut self) {
        self.resume_offset = self.duration;
        self.start_reference = None;
    }

    /// Moves the resume offset; only meaningful while stopped.
    pub fn seek(&mut self, position: f64) {
        let position = if position.is_finite() { position } else { 0.0 };
        self.resume_offset = position.clamp(0.0, self.duration);
        self.start_reference = None;
    }

    /// Resume offset expressed in frames at `sample_rate`.
    pub fn resume_frame(&self, sample_rate: u32) -> usize {
        (self.resume_offset * sample_rate as f64).round() as usize
    }
}

/// Cooperative position-update loop bound to the playing state.
///
/// The host calls [`tick`](PositionLoop::tick) from its redraw callback; the loop is
/// cancelled the moment the engine stops playing, or when the clock stops advancing.
#[derive(Debug, Default)]
pub struct PositionLoop {
    active: bool,
}

impl PositionLoop {
    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns whether a position update should be produced for this frame.
    pub fn tick(&mut self, clock: &AudioClock) -> bool {
        if self.active && !clock.is_running() {
            log::warn!("Audio clock stopped advancing, ending position updates");
            self.active = false;
        }
        self.active
    }
}
