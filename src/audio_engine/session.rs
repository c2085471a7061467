//! Single-use playback sessions.
//!
//! A [`PlaybackSession`] is created for every transition into playing. Starting it
//! consumes it and yields an [`ActiveSession`] that lives on the audio thread until it
//! is stopped or runs out of frames; neither can be restarted.

use crate::messages::DecodedAudio;

/// A session that has been created but not started yet.
#[derive(Debug)]
pub struct PlaybackSession {
    id: u64,
    audio: DecodedAudio,
    start_frame: usize,
}

impl PlaybackSession {
    pub fn new(id: u64, audio: DecodedAudio, start_frame: usize) -> Self {
        Self {
            id,
            audio,
            start_frame,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn channels(&self) -> usize {
        self.audio.channels
    }

    /// Starts the session. The value is consumed.
    pub fn start(self) -> ActiveSession {
        let frame_pos = self.start_frame.min(self.audio.frames());
        ActiveSession {
            id: self.id,
            audio: self.audio,
            frame_pos,
        }
    }
}

/// A running session, owned by the audio thread.
#[derive(Debug)]
pub struct ActiveSession {
    id: u64,
    audio: DecodedAudio,
    frame_pos: usize,
}

impl ActiveSession {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current playback position in frames.
    pub fn frame_pos(&self) -> usize {
        self.frame_pos
    }

    pub fn is_finished(&self) -> bool {
        self.frame_pos >= self.audio.frames()
    }

    /// Copies the next frames into a silent interleaved `output`.
    ///
    /// Returns `true` once the last frame has been written.
    pub fn render_into(&mut self, output: &mut [f32]) -> bool {
        let channels = self.audio.channels;
        if channels == 0 {
            return true;
        }

        let remaining = self.audio.frames().saturating_sub(self.frame_pos);
        let frames = (output.len() / channels).min(remaining);
        let start = self.frame_pos * channels;
        let end = start + frames * channels;
        output[..frames * channels].copy_from_slice(&self.audio.samples[start..end]);
        self.frame_pos += frames;

        self.is_finished()
    }
}
