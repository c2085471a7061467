//! WAV fixtures shared by unit tests.

use std::fs;
use std::path::Path;

/// Encodes interleaved 16-bit samples as a canonical PCM WAV file.
pub fn pcm16_wav_bytes(channels: u16, sample_rate_hz: u32, samples: &[i16]) -> Vec<u8> {
    let bits_per_sample = 16u16;
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate_hz * u32::from(block_align);
    let data_len_bytes = u32::try_from(samples.len() * 2).expect("sample data too large");
    let chunk_size = 36 + data_len_bytes;

    let mut bytes = Vec::with_capacity(44 + samples.len() * 2);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&chunk_size.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate_hz.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&bits_per_sample.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len_bytes.to_le_bytes());
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }

    bytes
}

pub fn write_pcm16_wav(
    path: &Path,
    channels: u16,
    sample_rate_hz: u32,
    samples: &[i16],
) -> std::io::Result<()> {
    fs::write(path, pcm16_wav_bytes(channels, sample_rate_hz, samples))
}

/// A mono 440 Hz tone at half scale lasting `secs` seconds.
pub fn sine_wav_bytes(sample_rate_hz: u32, secs: f64) -> Vec<u8> {
    let frames = (secs * sample_rate_hz as f64).round() as usize;
    let samples: Vec<i16> = (0..frames)
        .map(|i| {
            let t = i as f64 / sample_rate_hz as f64;
            ((2.0 * std::f64::consts::PI * 440.0 * t).sin() * 16_384.0) as i16
        })
        .collect();
    pcm16_wav_bytes(1, sample_rate_hz, &samples)
}
