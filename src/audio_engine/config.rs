//! Runtime engine configuration.

use crate::audio_engine::constants::{
    FREQ_SMOOTHING_TIME_CONSTANT_S, OUTPUT_BUFFER_FRAMES, RING_CAPACITY,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Requested device buffer size in frames.
    pub buffer_frames: u32,

    /// Capacity of the control and audio ring buffers.
    pub ring_capacity: usize,

    /// Time constant of cutoff glides in seconds. Zero applies changes immediately.
    pub smoothing_time_constant_s: f32,

    /// Output sample rate; `None` uses the device default.
    pub sample_rate: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_frames: OUTPUT_BUFFER_FRAMES,
            ring_capacity: RING_CAPACITY,
            smoothing_time_constant_s: FREQ_SMOOTHING_TIME_CONSTANT_S,
            sample_rate: None,
        }
    }
}
