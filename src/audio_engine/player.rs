//! Real-time player.
//!
//! This module provides the [`RtPlayer`] struct which lives on the audio thread. It owns
//! the [`FilterChain`](crate::audio_engine::filter_chain::FilterChain) and at most one
//! [`ActiveSession`](crate::audio_engine::session::ActiveSession), renders the session
//! through the chain and advances the shared [`AudioClock`].

use cpal::Sample;

use crate::audio_engine::filter_chain::{FilterChain, FrequencyRange};
use crate::audio_engine::session::{ActiveSession, PlaybackSession};
use crate::audio_engine::transport::AudioClock;

/// Audio-thread half of the engine.
///
/// Holding the session in an `Option` makes two simultaneous sessions unrepresentable.
pub struct RtPlayer {
    /// Number of output channels.
    channels: usize,

    /// Clock advanced by every rendered block.
    clock: AudioClock,

    /// Band-pass chain, installed on first playback.
    chain: Option<Box<FilterChain>>,

    /// The session currently streaming, if any.
    session: Option<ActiveSession>,
}

impl RtPlayer {
    pub fn new(channels: usize, clock: AudioClock) -> Self {
        Self {
            channels,
            clock,
            chain: None,
            session: None,
        }
    }

    /// Installs the filter chain unless one is already in place.
    pub fn install_filter_chain(&mut self, chain: Box<FilterChain>) {
        if self.chain.is_some() {
            return;
        }
        self.chain = Some(chain);
    }

    /// Starts a new session, replacing any previous one.
    ///
    /// Sessions whose channel layout does not match the output are dropped.
    pub fn start_session(&mut self, session: PlaybackSession) {
        if session.channels() != self.channels {
            return;
        }
        self.session = Some(session.start());
    }

    /// Stops the session with `session_id` if it is still active.
    pub fn stop_session(&mut self, session_id: u64) {
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.id() == session_id)
        {
            self.session = None;
        }
    }

    pub fn set_frequency_range(&mut self, range: FrequencyRange) {
        if let Some(chain) = self.chain.as_mut() {
            chain.set_range(range);
        }
    }

    /// Id and frame position of the active session.
    pub fn session_position(&self) -> Option<(u64, usize)> {
        self.session
            .as_ref()
            .map(|session| (session.id(), session.frame_pos()))
    }

    pub fn filter_chain(&self) -> Option<&FilterChain> {
        self.chain.as_deref()
    }

    /// Renders one interleaved block.
    ///
    /// Returns the id of a session that reached its last frame during this block; that
    /// session has been dropped.
    pub fn render(&mut self, output: &mut [f32]) -> Option<u64> {
        output.fill(Sample::EQUILIBRIUM);

        if self.channels == 0 {
            return None;
        }

        let frames = output.len() / self.channels;
        if frames == 0 {
            return None;
        }

        let mut ended = None;
        if let Some(session) = self.session.as_mut() {
            if session.render_into(output) {
                ended = Some(session.id());
                self.session = None;
            }
        }

        if let Some(chain) = self.chain.as_mut() {
            chain.process_interleaved(output);
        }

        self.clock.advance(frames);
        ended
    }

    /// Gets the number of channels configured for this player.
    pub fn channels(&self) -> usize {
        self.channels
    }
}
