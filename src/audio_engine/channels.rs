use crate::audio_engine::errors::DecodeError;

/// Maps audio samples from one channel configuration to another.
///
/// Currently supports:
/// - Same channel count: no conversion needed
/// - Mono (1 channel) → N channels: duplicates the mono signal to every channel
/// - N channels → Mono: averages all channels of a frame
/// - N channels → Stereo (N > 2): keeps the front left/right pair
/// - N channels → M > N channels: keeps the N source channels, silences the rest
///
/// # Parameters
///
/// - `samples`: Interleaved audio samples to convert
/// - `file_channels`: Number of channels in the source audio
/// - `output_channels`: Number of channels for the output
///
/// # Returns
///
/// - `Ok(Vec<f32>)`: Samples with converted channel layout
/// - `Err(DecodeError)`: Unsupported channel mapping
pub fn map_channels(
    samples: Vec<f32>,
    file_channels: usize,
    output_channels: usize,
) -> Result<Vec<f32>, DecodeError> {
    if file_channels == output_channels {
        return Ok(samples);
    }

    match (file_channels, output_channels) {
        (0, _) | (_, 0) => Err(DecodeError::UnsupportedChannels {
            file_channels,
            output_channels,
        }),
        // Mono → N: duplicate each sample
        (1, n) => {
            let mut out = Vec::with_capacity(samples.len() * n);
            for s in samples {
                out.extend(std::iter::repeat_n(s, n));
            }
            Ok(out)
        }
        // N → Mono: average each frame
        (n, 1) => {
            let scale = 1.0 / n as f32;
            let mut out = Vec::with_capacity(samples.len() / n);
            for frame in samples.chunks_exact(n) {
                out.push(frame.iter().sum::<f32>() * scale);
            }
            Ok(out)
        }
        // Surround → Stereo: front pair
        (n, 2) if n > 2 => {
            let mut out = Vec::with_capacity(samples.len() / n * 2);
            for frame in samples.chunks_exact(n) {
                out.push(frame[0]);
                out.push(frame[1]);
            }
            Ok(out)
        }
        // N → more channels: source layout in the first N slots, rest silent
        (n, m) if n < m => {
            let mut out = Vec::with_capacity(samples.len() / n * m);
            for frame in samples.chunks_exact(n) {
                out.extend_from_slice(frame);
                out.extend(std::iter::repeat_n(0.0, m - n));
            }
            Ok(out)
        }
        // Unsupported mapping
        _ => Err(DecodeError::UnsupportedChannels {
            file_channels,
            output_channels,
        }),
    }
}
