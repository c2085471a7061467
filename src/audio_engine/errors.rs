//! Audio-specific error types.

use thiserror::Error;

/// Errors that can occur while decoding audio bytes into a playable buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The container could not be probed or a packet failed to decode.
    #[error("failed to decode audio data: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// Failed to create resampler.
    #[error("failed to create resampler: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),

    /// Failed to resample audio.
    #[error("failed to resample audio: {0}")]
    Resample(#[from] rubato::ResampleError),

    /// Audio data has no default track.
    #[error("audio data has no default track")]
    NoDefaultTrack,

    /// Audio data is missing sample rate information.
    #[error("audio data is missing a sample rate")]
    MissingSampleRate,

    /// Audio data is missing channel information.
    #[error("audio data is missing channel information")]
    MissingChannels,

    /// The stream decoded to zero frames.
    #[error("audio data contains no samples")]
    Empty,

    /// Unsupported channel mapping configuration.
    #[error(
        "unsupported channel mapping: data has {file_channels} channels, output has {output_channels} channels"
    )]
    UnsupportedChannels {
        /// Number of channels in the source data.
        file_channels: usize,
        /// Number of channels expected for output.
        output_channels: usize,
    },
}

/// Errors from the linear/logarithmic frequency mapping.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FrequencyMapError {
    /// The range cannot carry a logarithmic scale.
    #[error("invalid frequency range: min={min}, max={max} (need 0 < min < max)")]
    InvalidRange { min: f64, max: f64 },
}

/// Errors while opening the output device.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("no audio output device found")]
    NoDevice,

    #[error("no default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}
