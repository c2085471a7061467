//! Audio Engine Module
//!
//! This module provides band-cut playback of a single track. It is organized into
//! sub-modules, each with a specific responsibility:
//!
//! - [`audio_stream`]: output connection, ring buffers and the real-time callback
//! - [`biquad`]: Butterworth second-order sections
//! - [`filter_chain`]: the 4 + 4 stage band-pass cascade and its frequency range
//! - [`frequency_map`]: linear control position <-> logarithmic frequency
//! - [`player`]: audio-thread renderer
//! - [`session`]: single-use playback sessions
//! - [`sample_loader`]: audio decoding
//! - [`transport`]: engine states, clocks and the position-update loop
//!
//! The main [`AudioEngine`] struct orchestrates these components from the control thread.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

use crate::audio_engine::audio_stream::{AudioOutput, create_audio_stream};
use crate::audio_engine::config::EngineConfig;
use crate::audio_engine::errors::{DecodeError, StreamError};
use crate::audio_engine::filter_chain::{FilterChain, FrequencyRange};
use crate::audio_engine::progress::{LoadProgressStage, ProgressReporter};
use crate::audio_engine::sample_loader::{
    LoadProgress, LoadSubtask, decode_audio_bytes, decode_audio_bytes_with_progress,
};
use crate::audio_engine::session::PlaybackSession;
use crate::audio_engine::transport::{EngineState, PositionLoop, TransportClock};
use crate::messages::{AudioMessage, ControlMessage, DecodedAudio, EngineEvent, LoaderEvent};

pub mod audio_stream;
pub mod biquad;
pub mod channels;
pub mod config;
pub mod constants;
pub mod errors;
pub mod filter_chain;
pub mod frequency_map;
pub mod player;
pub mod progress;
pub mod resample;
pub mod sample_loader;
pub mod session;
pub mod transport;

/// AudioEngine plays one decoded track through a steep band-pass filter.
///
/// All methods are meant to be called from a single control thread. Calls that are not
/// valid in the current state are ignored.
pub struct AudioEngine {
    output: AudioOutput,
    config: EngineConfig,
    state: EngineState,
    audio: Option<DecodedAudio>,
    transport: TransportClock,
    position_loop: PositionLoop,
    range: FrequencyRange,
    chain_built: bool,
    session_id: Option<u64>,
    next_session_id: u64,
    load_id: u64,
    loader_tx: Sender<LoaderEvent>,
    loader_rx: Receiver<LoaderEvent>,
    events: VecDeque<EngineEvent>,
}

impl AudioEngine {
    /// Create a new AudioEngine playing on the default output device.
    pub fn new(config: EngineConfig) -> Result<Self, StreamError> {
        let output = create_audio_stream(&config)?;
        Ok(Self::with_output(output, config))
    }

    /// Create an engine on an existing output.
    pub fn with_output(output: AudioOutput, config: EngineConfig) -> Self {
        let (loader_tx, loader_rx) = std::sync::mpsc::channel();

        AudioEngine {
            output,
            config,
            state: EngineState::Unloaded,
            audio: None,
            transport: TransportClock::default(),
            position_loop: PositionLoop::default(),
            range: FrequencyRange::FULL,
            chain_built: false,
            session_id: None,
            next_session_id: 1,
            load_id: 0,
            loader_tx,
            loader_rx,
            events: VecDeque::new(),
        }
    }

    /// Decode `bytes` on a background thread and make them the current track.
    ///
    /// Any playing session is stopped first. The result arrives as
    /// [`EngineEvent::Loaded`] or [`EngineEvent::LoadFailed`].
    pub fn load_file(&mut self, bytes: Vec<u8>) {
        let load_id = self.begin_load();
        self.state = EngineState::Decoding;

        let loader_tx = self.loader_tx.clone();
        let output_channels = self.output.channels();
        let output_sample_rate = self.output.sample_rate();

        thread::spawn(move || {
            let _ = loader_tx.send(LoaderEvent::Started { load_id });

            let mut progress = ProgressReporter::new(load_id, loader_tx.clone());

            let audio = match decode_audio_bytes_with_progress(
                bytes,
                output_channels,
                output_sample_rate,
                |update: LoadProgress| {
                    let stage = match update.subtask {
                        LoadSubtask::Decoding => LoadProgressStage::Decoding,
                        LoadSubtask::Resampling => LoadProgressStage::Resampling,
                        LoadSubtask::ChannelMapping => LoadProgressStage::ChannelMapping,
                    };
                    let force = update.percent <= 0.0 || update.percent >= 1.0;
                    progress.emit(stage, update.percent, update.resampling_required, force);
                },
            ) {
                Ok(audio) => audio,
                Err(error) => {
                    let _ = loader_tx.send(LoaderEvent::Error { load_id, error });
                    return;
                }
            };

            progress.emit(
                LoadProgressStage::Publishing,
                1.0,
                progress.resampling_required.unwrap_or(true),
                true,
            );
            let _ = loader_tx.send(LoaderEvent::Success { load_id, audio });
        });
    }

    /// Decode `bytes` on the calling thread and make them the current track.
    ///
    /// Returns the track duration in seconds.
    pub fn load_file_blocking(&mut self, bytes: Vec<u8>) -> Result<f64, DecodeError> {
        self.begin_load();

        match decode_audio_bytes(bytes, self.output.channels(), self.output.sample_rate()) {
            Ok(audio) => Ok(self.apply_loaded(audio)),
            Err(error) => {
                log::warn!("Failed to decode audio: {}", error);
                self.state = EngineState::Unloaded;
                Err(error)
            }
        }
    }

    /// Start playback at the resume offset.
    pub fn play(&mut self) {
        if self.state != EngineState::Ready {
            log::debug!("play() ignored in state {:?}", self.state);
            return;
        }
        let Some(audio) = self.audio.clone() else {
            return;
        };

        if !self.chain_built {
            let chain = FilterChain::new(
                self.output.sample_rate(),
                self.output.channels(),
                self.range,
                self.config.smoothing_time_constant_s,
            );
            if !self
                .output
                .send(ControlMessage::InstallFilterChain(Box::new(chain)))
            {
                log::error!("Failed to send InstallFilterChain - buffer may be full");
                return;
            }
            self.chain_built = true;
        }

        if self.transport.resume_offset() >= self.transport.duration() {
            self.transport.seek(0.0);
        }

        self.start_session(audio);
    }

    /// Stop playback and remember the position.
    pub fn pause(&mut self) {
        if self.state != EngineState::Playing {
            log::debug!("pause() ignored in state {:?}", self.state);
            return;
        }

        self.stop_session();
        self.state = EngineState::Ready;
        log::debug!("Paused at {:.3}s", self.transport.resume_offset());
    }

    /// Move the playback position, in seconds.
    pub fn seek(&mut self, position: f64) {
        match self.state {
            EngineState::Ready => self.transport.seek(position),
            EngineState::Playing => {
                let Some(audio) = self.audio.clone() else {
                    return;
                };
                self.stop_session();
                self.transport.seek(position);
                self.start_session(audio);
            }
            EngineState::Unloaded | EngineState::Decoding => {
                log::debug!("seek() ignored in state {:?}", self.state);
            }
        }
    }

    /// Set the pass band. Ignored until the filter chain exists (first `play()`).
    ///
    /// Values are clamped to 20..=20000 Hz and never produce an inverted band.
    pub fn set_frequency_range(&mut self, low_hz: f32, high_hz: f32) {
        if !self.chain_built {
            log::debug!("set_frequency_range() ignored before first playback");
            return;
        }

        let range = FrequencyRange::corrected(low_hz, high_hz, self.range);
        if !self.output.send(ControlMessage::SetFrequencyRange(range)) {
            log::error!("Failed to send SetFrequencyRange - buffer may be full");
            return;
        }
        self.range = range;
    }

    /// Position-update loop body, to be called from the host's redraw callback.
    ///
    /// Returns the current time while playing, `None` once the loop has ended.
    pub fn tick(&mut self) -> Option<f64> {
        self.pump();
        if !self.position_loop.tick(self.output.clock()) {
            return None;
        }
        Some(self.current_time())
    }

    /// Next pending engine event, if any.
    pub fn poll_event(&mut self) -> Option<EngineEvent> {
        self.pump();
        self.events.pop_front()
    }

    /// Current state, after applying any end-of-stream report from the audio thread.
    pub fn state(&mut self) -> EngineState {
        self.drain_audio_messages();
        self.state
    }

    pub fn is_playing(&mut self) -> bool {
        self.state() == EngineState::Playing
    }

    pub fn is_ready(&self) -> bool {
        self.audio.is_some() && matches!(self.state, EngineState::Ready | EngineState::Playing)
    }

    /// Duration of the loaded track in seconds, 0 when nothing is loaded.
    pub fn duration(&self) -> f64 {
        self.transport.duration()
    }

    /// Elapsed playback time in seconds, within `0..=duration`.
    pub fn current_time(&mut self) -> f64 {
        self.drain_audio_messages();
        match self.state {
            EngineState::Playing => self.transport.elapsed(self.output.clock().now_secs()),
            _ => self.transport.resume_offset(),
        }
    }

    /// The band last applied to the filter chain.
    pub fn frequency_range(&self) -> FrequencyRange {
        self.range
    }

    pub fn output(&self) -> &AudioOutput {
        &self.output
    }

    /// Stops playback and forgets the current track for a new load.
    fn begin_load(&mut self) -> u64 {
        if self.state == EngineState::Playing {
            self.stop_session();
        }
        self.audio = None;
        self.transport.reset(0.0);
        self.load_id += 1;
        self.load_id
    }

    fn apply_loaded(&mut self, audio: DecodedAudio) -> f64 {
        let duration = audio.duration_secs();
        self.transport.reset(duration);
        self.audio = Some(audio);
        self.state = EngineState::Ready;
        log::info!("Loaded track ({:.3}s)", duration);
        duration
    }

    fn start_session(&mut self, audio: DecodedAudio) {
        let session_id = self.next_session_id;
        self.next_session_id += 1;

        let start_frame = self.transport.resume_frame(self.output.sample_rate());
        let session = PlaybackSession::new(session_id, audio, start_frame);
        if !self.output.send(ControlMessage::StartSession(session)) {
            log::error!("Failed to send StartSession - buffer may be full");
            self.state = EngineState::Ready;
            return;
        }

        self.transport.start(self.output.clock().now_secs());
        self.session_id = Some(session_id);
        self.position_loop.start();
        self.state = EngineState::Playing;
        log::debug!(
            "Started session {} at {:.3}s",
            session_id,
            self.transport.resume_offset()
        );
    }

    fn stop_session(&mut self) {
        if let Some(session_id) = self.session_id.take() {
            if !self.output.send(ControlMessage::StopSession { session_id }) {
                log::error!("Failed to send StopSession - buffer may be full");
            }
        }
        self.transport.freeze(self.output.clock().now_secs());
        self.position_loop.cancel();
    }

    fn finish_session(&mut self) {
        self.session_id = None;
        self.transport.finish();
        self.position_loop.cancel();
        self.state = EngineState::Ready;
        self.events.push_back(EngineEvent::Ended);
        log::debug!("Reached end of track");
    }

    /// Drains loader events and audio-thread messages.
    fn pump(&mut self) {
        loop {
            let event = match self.loader_rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            self.handle_loader_event(event);
        }

        self.drain_audio_messages();
    }

    fn drain_audio_messages(&mut self) {
        while let Some(message) = self.output.try_recv() {
            match message {
                AudioMessage::SessionEnded { session_id } => {
                    if self.session_id == Some(session_id) {
                        self.finish_session();
                    }
                }
            }
        }
    }

    fn handle_loader_event(&mut self, event: LoaderEvent) {
        match event {
            LoaderEvent::Started { load_id } => {
                log::debug!("Load {} started", load_id);
            }
            LoaderEvent::Progress {
                load_id,
                percent,
                stage,
            } => {
                if load_id == self.load_id && self.state == EngineState::Decoding {
                    self.events
                        .push_back(EngineEvent::LoadProgress { percent, stage });
                }
            }
            LoaderEvent::Success { load_id, audio } => {
                if load_id != self.load_id || self.state != EngineState::Decoding {
                    log::debug!("Discarding stale load {}", load_id);
                    return;
                }
                let duration = self.apply_loaded(audio);
                self.events.push_back(EngineEvent::Loaded { duration });
            }
            LoaderEvent::Error { load_id, error } => {
                if load_id != self.load_id || self.state != EngineState::Decoding {
                    log::debug!("Discarding stale load error {}", load_id);
                    return;
                }
                log::warn!("Failed to decode audio: {}", error);
                self.state = EngineState::Unloaded;
                self.events.push_back(EngineEvent::LoadFailed(error));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::audio_engine::audio_stream::RenderContext;
    use crate::test_support::{pcm16_wav_bytes, sine_wav_bytes};

    const RATE: u32 = 8_000;
    const BLOCK: usize = 400;

    fn offline_engine() -> (AudioEngine, RenderContext) {
        let (output, context) = AudioOutput::offline(1, RATE, 64);
        (AudioEngine::with_output(output, EngineConfig::default()), context)
    }

    fn render_secs(context: &mut RenderContext, secs: f64) {
        let blocks = (secs * RATE as f64 / BLOCK as f64).round() as usize;
        let mut block = vec![0.0; BLOCK];
        for _ in 0..blocks {
            context.process(&mut block);
        }
    }

    fn wait_for_load(engine: &mut AudioEngine) -> EngineEvent {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            match engine.poll_event() {
                Some(EngineEvent::LoadProgress { .. }) => continue,
                Some(event) => return event,
                None => thread::sleep(Duration::from_millis(5)),
            }
        }
        panic!("load did not finish");
    }

    #[test]
    fn test_engine_starts_unloaded() {
        let (mut engine, _context) = offline_engine();
        assert_eq!(engine.state(), EngineState::Unloaded);
        assert!(!engine.is_ready());
        assert!(!engine.is_playing());
        assert_eq!(engine.duration(), 0.0);
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn test_blocking_load_publishes_duration() {
        let (mut engine, _context) = offline_engine();
        let duration = engine
            .load_file_blocking(sine_wav_bytes(RATE, 2.0))
            .unwrap();

        assert!((duration - 2.0).abs() < 1e-9);
        assert!(engine.is_ready());
        assert!(engine.duration() > 0.0);
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn test_failed_load_leaves_engine_unready() {
        let (mut engine, _context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 1.0)).unwrap();

        let result = engine.load_file_blocking(b"not audio at all".to_vec());
        assert!(result.is_err());
        assert!(!engine.is_ready());
        assert_eq!(engine.state(), EngineState::Unloaded);

        engine.play();
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_async_load_reports_loaded() {
        let (mut engine, _context) = offline_engine();
        engine.load_file(sine_wav_bytes(RATE, 1.5));
        assert_eq!(engine.state(), EngineState::Decoding);

        match wait_for_load(&mut engine) {
            EngineEvent::Loaded { duration } => assert!((duration - 1.5).abs() < 1e-9),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(engine.is_ready());
    }

    #[test]
    fn test_async_load_failure_is_surfaced() {
        let (mut engine, _context) = offline_engine();
        engine.load_file(vec![0u8; 64]);

        assert!(matches!(
            wait_for_load(&mut engine),
            EngineEvent::LoadFailed(_)
        ));
        assert!(!engine.is_ready());
        assert_eq!(engine.state(), EngineState::Unloaded);
    }

    #[test]
    fn test_play_is_rejected_while_decoding() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file(sine_wav_bytes(RATE, 1.0));

        engine.play();
        assert!(!engine.is_playing());
        context.process(&mut [0.0; BLOCK]);
        assert!(context.player().session_position().is_none());

        // Pausing has no session to affect either.
        engine.pause();
        assert_eq!(engine.state(), EngineState::Decoding);

        wait_for_load(&mut engine);
        engine.play();
        assert!(engine.is_playing());
    }

    #[test]
    fn test_newer_load_supersedes_pending_one() {
        let (mut engine, _context) = offline_engine();
        engine.load_file(sine_wav_bytes(RATE, 3.0));
        let duration = engine.load_file_blocking(sine_wav_bytes(RATE, 1.0)).unwrap();
        assert!((duration - 1.0).abs() < 1e-9);

        // Give the background decode time to finish; its result must be ignored.
        thread::sleep(Duration::from_millis(200));
        while engine.poll_event().is_some() {}
        assert!((engine.duration() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_play_then_pause_has_no_phantom_time() {
        let (mut engine, _context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 2.0)).unwrap();

        engine.play();
        assert!(engine.is_playing());
        engine.pause();

        assert!(!engine.is_playing());
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn test_pause_and_resume_continue_from_offset() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 20.0)).unwrap();

        engine.play();
        render_secs(&mut context, 10.0);
        assert!((engine.tick().unwrap() - 10.0).abs() < 1e-9);

        engine.pause();
        assert!((engine.current_time() - 10.0).abs() < 1e-9);
        assert_eq!(engine.tick(), None);

        // Time spent paused does not count.
        render_secs(&mut context, 3.0);
        assert!((engine.current_time() - 10.0).abs() < 1e-9);

        engine.play();
        render_secs(&mut context, 0.05);
        let (_, frame_pos) = context.player().session_position().unwrap();
        assert_eq!(frame_pos, 10 * RATE as usize + BLOCK);

        render_secs(&mut context, 1.95);
        assert!((engine.current_time() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_each_play_uses_a_fresh_session() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 5.0)).unwrap();

        engine.play();
        render_secs(&mut context, 0.05);
        let (first, _) = context.player().session_position().unwrap();

        engine.pause();
        render_secs(&mut context, 0.05);
        assert!(context.player().session_position().is_none());

        engine.play();
        render_secs(&mut context, 0.05);
        let (second, _) = context.player().session_position().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_end_of_stream_freezes_at_duration() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 1.0)).unwrap();

        engine.play();
        render_secs(&mut context, 0.5);
        assert!(engine.tick().is_some());

        render_secs(&mut context, 1.0);
        // The clock ran past the end; reported time never exceeds the duration.
        assert!(engine.current_time() <= engine.duration());

        assert_eq!(engine.tick(), None);
        assert!(!engine.is_playing());
        assert!(engine.is_ready());
        assert_eq!(engine.current_time(), engine.duration());
        assert!(matches!(engine.poll_event(), Some(EngineEvent::Ended)));

        // Playing again after the end starts over.
        engine.play();
        render_secs(&mut context, 0.05);
        let (_, frame_pos) = context.player().session_position().unwrap();
        assert_eq!(frame_pos, BLOCK);
    }

    #[test]
    fn test_observables_see_end_of_stream_without_tick() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 1.0)).unwrap();

        engine.play();
        render_secs(&mut context, 1.5);

        assert!(!engine.is_playing());
        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.current_time(), engine.duration());
        assert!(matches!(engine.poll_event(), Some(EngineEvent::Ended)));
    }

    #[test]
    fn test_stereo_track_plays_on_surround_output() {
        let (output, mut context) = AudioOutput::offline(6, RATE, 64);
        let mut engine = AudioEngine::with_output(output, EngineConfig::default());

        let samples: Vec<i16> = (0..RATE as usize)
            .flat_map(|_| [8_192i16, -8_192i16])
            .collect();
        let duration = engine
            .load_file_blocking(pcm16_wav_bytes(2, RATE, &samples))
            .unwrap();
        assert!((duration - 1.0).abs() < 1e-9);
        assert!(engine.is_ready());

        engine.play();
        let mut block = vec![0.0; 6 * BLOCK];
        context.process(&mut block);
        assert_eq!(context.player().session_position().map(|(_, pos)| pos), Some(BLOCK));
        assert!(engine.is_playing());
    }

    #[test]
    fn test_frequency_range_ignored_before_first_play() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 1.0)).unwrap();

        engine.set_frequency_range(200.0, 2_000.0);
        assert_eq!(engine.frequency_range(), FrequencyRange::FULL);

        engine.play();
        render_secs(&mut context, 0.05);
        let chain = context.player().filter_chain().unwrap();
        assert_eq!(chain.range(), FrequencyRange::FULL);
    }

    #[test]
    fn test_frequency_range_is_clamped_and_applied() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 1.0)).unwrap();
        engine.play();

        engine.set_frequency_range(5.0, 25_000.0);
        assert_eq!(engine.frequency_range().low_hz(), 20.0);
        assert_eq!(engine.frequency_range().high_hz(), 20_000.0);

        engine.set_frequency_range(300.0, 3_000.0);
        engine.set_frequency_range(400.0, 3_500.0);
        render_secs(&mut context, 0.05);

        // Last call wins; transport untouched.
        let chain = context.player().filter_chain().unwrap();
        assert_eq!(chain.range(), engine.frequency_range());
        assert_eq!(chain.range().low_hz(), 400.0);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_frequency_range_never_inverts() {
        let (mut engine, _context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 1.0)).unwrap();
        engine.play();

        engine.set_frequency_range(1_000.0, 1_000.0);
        let range = engine.frequency_range();
        assert!(range.low_hz() < range.high_hz());

        engine.set_frequency_range(8_000.0, 500.0);
        let range = engine.frequency_range();
        assert!(range.low_hz() < range.high_hz());
    }

    #[test]
    fn test_frequency_range_survives_pause() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 1.0)).unwrap();
        engine.play();
        engine.pause();

        engine.set_frequency_range(100.0, 1_000.0);
        assert!(!engine.is_playing());
        render_secs(&mut context, 0.05);
        assert_eq!(
            context.player().filter_chain().map(|c| c.range()),
            Some(engine.frequency_range())
        );
    }

    #[test]
    fn test_loading_stops_active_session() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 5.0)).unwrap();
        engine.play();
        render_secs(&mut context, 1.0);

        engine.load_file_blocking(sine_wav_bytes(RATE, 2.0)).unwrap();
        render_secs(&mut context, 0.05);

        assert!(context.player().session_position().is_none());
        assert!(!engine.is_playing());
        assert_eq!(engine.current_time(), 0.0);
        assert!((engine.duration() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_seek_while_ready_and_playing() {
        let (mut engine, mut context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 10.0)).unwrap();

        engine.seek(4.0);
        assert_eq!(engine.current_time(), 4.0);

        engine.play();
        render_secs(&mut context, 1.0);
        assert!((engine.current_time() - 5.0).abs() < 1e-9);

        engine.seek(2.0);
        render_secs(&mut context, 0.05);
        let (_, frame_pos) = context.player().session_position().unwrap();
        assert_eq!(frame_pos, 2 * RATE as usize + BLOCK);
        assert!((engine.current_time() - 2.05).abs() < 1e-9);

        engine.seek(99.0);
        render_secs(&mut context, 0.05);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.current_time(), engine.duration());
    }

    #[test]
    fn test_position_loop_stops_when_clock_stalls() {
        let (mut engine, _context) = offline_engine();
        engine.load_file_blocking(sine_wav_bytes(RATE, 1.0)).unwrap();
        engine.play();
        assert!(engine.tick().is_some());

        engine.output().clock().set_running(false);
        assert_eq!(engine.tick(), None);
    }
}
