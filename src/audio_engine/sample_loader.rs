//! Audio decoding.
//!
//! This module turns raw file bytes into a [`DecodedAudio`] buffer that matches the
//! output's channel count and sample rate, ready to be streamed by a playback session.

use std::io::Cursor;
use std::sync::Arc;
use symphonia::core::{
    audio::SampleBuffer as SymphoniaSampleBuffer, codecs::DecoderOptions,
    errors::Error as SymphoniaError, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::audio_engine::channels::map_channels;
use crate::audio_engine::errors::DecodeError;
use crate::audio_engine::resample::resample_interleaved;
use crate::messages::DecodedAudio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSubtask {
    Decoding,
    Resampling,
    ChannelMapping,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadProgress {
    pub subtask: LoadSubtask,
    /// Progress of the subtask (0.0..=1.0).
    pub percent: f32,
    pub resampling_required: bool,
}

/// Decodes in-memory audio into a buffer with the specified output configuration.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the format is not recognized, the data is corrupt,
/// the stream carries no samples, or the channel layout cannot be mapped.
pub fn decode_audio_bytes(
    bytes: Vec<u8>,
    output_channels: usize,
    output_rate_hz: u32,
) -> Result<DecodedAudio, DecodeError> {
    decode_audio_bytes_with_progress(bytes, output_channels, output_rate_hz, |_| {})
}

/// Same as [`decode_audio_bytes`], reporting progress through `on_progress`.
pub fn decode_audio_bytes_with_progress(
    bytes: Vec<u8>,
    output_channels: usize,
    output_rate_hz: u32,
    mut on_progress: impl FnMut(LoadProgress),
) -> Result<DecodedAudio, DecodeError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let probed = get_probe().format(
        &Hint::new(),
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format.default_track().ok_or(DecodeError::NoDefaultTrack)?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let file_rate_hz = codec_params
        .sample_rate
        .ok_or(DecodeError::MissingSampleRate)?;
    let mut file_channels = codec_params.channels.map(|c| c.count());
    let expected_frames = codec_params.n_frames;
    let resampling_required = file_rate_hz != output_rate_hz;

    let mut decoder = get_codecs().make(&codec_params, &DecoderOptions::default())?;

    on_progress(LoadProgress {
        subtask: LoadSubtask::Decoding,
        percent: 0.0,
        resampling_required,
    });

    let mut decoded: Vec<f32> = Vec::new();
    let mut decoded_frames: u64 = 0;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(DecodeError::Decode(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = decoder.decode(&packet)?;
        let spec = *audio_buf.spec();
        let capacity = audio_buf.capacity() as u64;
        decoded_frames += audio_buf.frames() as u64;
        file_channels.get_or_insert(spec.channels.count());

        let mut sample_buf = SymphoniaSampleBuffer::<f32>::new(capacity, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        decoded.extend_from_slice(sample_buf.samples());

        if let Some(total) = expected_frames.filter(|total| *total > 0) {
            on_progress(LoadProgress {
                subtask: LoadSubtask::Decoding,
                percent: decoded_frames as f32 / total as f32,
                resampling_required,
            });
        }
    }

    let file_channels = file_channels.ok_or(DecodeError::MissingChannels)?;
    if decoded.is_empty() {
        return Err(DecodeError::Empty);
    }

    on_progress(LoadProgress {
        subtask: LoadSubtask::Decoding,
        percent: 1.0,
        resampling_required,
    });

    let resampled = if resampling_required {
        log::debug!("Resampling from {} Hz to {} Hz", file_rate_hz, output_rate_hz);
        resample_interleaved(
            &decoded,
            file_channels,
            file_rate_hz,
            output_rate_hz,
            |percent| {
                on_progress(LoadProgress {
                    subtask: LoadSubtask::Resampling,
                    percent,
                    resampling_required,
                })
            },
        )?
    } else {
        decoded
    };

    on_progress(LoadProgress {
        subtask: LoadSubtask::ChannelMapping,
        percent: 0.0,
        resampling_required,
    });
    let mapped = map_channels(resampled, file_channels, output_channels)?;
    on_progress(LoadProgress {
        subtask: LoadSubtask::ChannelMapping,
        percent: 1.0,
        resampling_required,
    });

    Ok(DecodedAudio {
        channels: output_channels,
        sample_rate: output_rate_hz,
        samples: Arc::from(mapped.into_boxed_slice()),
    })
}
