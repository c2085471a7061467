//! Whole-buffer sample rate conversion with rubato.

use rubato::{FftFixedIn, Resampler};

use crate::audio_engine::errors::DecodeError;

/// Input frames per resampler call.
const RESAMPLE_CHUNK_FRAMES: usize = 1024;

/// Sub-chunks used by the FFT resampler.
const RESAMPLE_SUB_CHUNKS: usize = 2;

/// Resamples interleaved audio from `from_hz` to `to_hz`.
///
/// The output has exactly `round(frames * to_hz / from_hz)` frames, with the
/// resampler's delay removed. `on_progress` receives the fraction of input consumed.
pub fn resample_interleaved(
    samples: &[f32],
    channels: usize,
    from_hz: u32,
    to_hz: u32,
    mut on_progress: impl FnMut(f32),
) -> Result<Vec<f32>, DecodeError> {
    if from_hz == to_hz || channels == 0 || samples.is_empty() {
        on_progress(1.0);
        return Ok(samples.to_vec());
    }

    let frames = samples.len() / channels;
    let expected = (frames as f64 * to_hz as f64 / from_hz as f64).round() as usize;

    let mut input: Vec<Vec<f32>> = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, sample) in frame.iter().enumerate() {
            input[channel].push(*sample);
        }
    }

    let mut resampler = FftFixedIn::<f32>::new(
        from_hz as usize,
        to_hz as usize,
        RESAMPLE_CHUNK_FRAMES,
        RESAMPLE_SUB_CHUNKS,
        channels,
    )?;
    let delay = resampler.output_delay();

    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(expected + delay); channels];

    let mut pos = 0;
    while frames - pos >= resampler.input_frames_next() {
        let next = resampler.input_frames_next();
        let chunk: Vec<&[f32]> = input.iter().map(|c| &c[pos..pos + next]).collect();
        let block = resampler.process(&chunk, None)?;
        append(&mut output, block);
        pos += next;
        on_progress(pos as f32 / frames as f32);
    }

    if pos < frames {
        let chunk: Vec<&[f32]> = input.iter().map(|c| &c[pos..]).collect();
        let block = resampler.process_partial(Some(chunk.as_slice()), None)?;
        append(&mut output, block);
    }

    // Flush the delay line.
    for _ in 0..8 {
        if output[0].len() >= expected + delay {
            break;
        }
        let block = resampler.process_partial::<Vec<f32>>(None, None)?;
        if block.first().is_none_or(|c| c.is_empty()) {
            break;
        }
        append(&mut output, block);
    }
    on_progress(1.0);

    for channel in &mut output {
        channel.drain(..delay.min(channel.len()));
        channel.resize(expected, 0.0);
    }

    let mut interleaved = Vec::with_capacity(expected * channels);
    for frame in 0..expected {
        for channel in &output {
            interleaved.push(channel[frame]);
        }
    }
    Ok(interleaved)
}

fn append(output: &mut [Vec<f32>], block: Vec<Vec<f32>>) {
    for (channel, data) in output.iter_mut().zip(block) {
        channel.extend_from_slice(&data);
    }
}
