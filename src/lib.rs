//! Band-cut audio player engine: plays one decoded track through a steep,
//! smoothly retunable band-pass filter, with a logarithmic control mapping.

pub mod audio_engine;
pub mod messages;

#[cfg(feature = "python")]
mod bindings;

#[cfg(test)]
mod test_support;

pub use audio_engine::AudioEngine;
pub use audio_engine::config::EngineConfig;
pub use audio_engine::errors::{DecodeError, FrequencyMapError, StreamError};
pub use audio_engine::filter_chain::FrequencyRange;
pub use audio_engine::frequency_map::{LogScale, to_frequency, to_position};
pub use audio_engine::transport::EngineState;
pub use messages::EngineEvent;

/// The Python module implemented in Rust.
#[cfg(feature = "python")]
#[pyo3::pymodule]
mod bandcut_audio {
    #[pymodule_export]
    use super::bindings::{PyAudioEngine, to_frequency, to_position};
}
