//! Audio Stream Module
//!
//! This module handles the connection between the engine and the audio thread:
//! - Ring buffers for control and audio messages
//! - CPAL output stream setup and the real-time callback
//! - An offline variant driven by the caller instead of a device
//! - Logger setup

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Stream, StreamConfig};
use env_logger::{Builder, Env};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::audio_engine::config::EngineConfig;
use crate::audio_engine::errors::StreamError;
use crate::audio_engine::player::RtPlayer;
use crate::audio_engine::transport::AudioClock;
use crate::messages::{AudioMessage, ControlMessage};

/// Control-side handle to an output, with its message channels and clock.
pub struct AudioOutput {
    /// `None` for offline outputs.
    stream: Option<Stream>,
    producer: Producer<ControlMessage>,
    consumer: Consumer<AudioMessage>,
    clock: AudioClock,
    channels: usize,
    sample_rate: u32,
}

impl AudioOutput {
    /// Creates an output that renders only when the caller drives the returned
    /// [`RenderContext`].
    pub fn offline(channels: usize, sample_rate: u32, ring_capacity: usize) -> (Self, RenderContext) {
        connect(None, channels, sample_rate, ring_capacity)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    pub fn is_offline(&self) -> bool {
        self.stream.is_none()
    }

    /// Queues a message for the audio thread. Returns `false` if the queue is full.
    pub fn send(&mut self, message: ControlMessage) -> bool {
        self.producer.push(message).is_ok()
    }

    /// Receives the next message from the audio thread.
    pub fn try_recv(&mut self) -> Option<AudioMessage> {
        self.consumer.pop().ok()
    }
}

/// Audio-thread side of an output: the player plus its message channels.
pub struct RenderContext {
    player: RtPlayer,
    consumer: Consumer<ControlMessage>,
    producer: Producer<AudioMessage>,
}

impl RenderContext {
    /// Applies pending control messages, then renders one interleaved block.
    pub fn process(&mut self, data: &mut [f32]) {
        while let Ok(message) = self.consumer.pop() {
            match message {
                ControlMessage::InstallFilterChain(chain) => {
                    self.player.install_filter_chain(chain);
                }
                ControlMessage::StartSession(session) => {
                    self.player.start_session(session);
                }
                ControlMessage::StopSession { session_id } => {
                    self.player.stop_session(session_id);
                }
                ControlMessage::SetFrequencyRange(range) => {
                    self.player.set_frequency_range(range);
                }
            }
        }

        if let Some(session_id) = self.player.render(data) {
            if self
                .producer
                .push(AudioMessage::SessionEnded { session_id })
                .is_err()
            {
                log::error!("Failed to send SessionEnded - buffer may be full");
            }
        }
    }

    pub fn player(&self) -> &RtPlayer {
        &self.player
    }
}

/// Setup and configure the logger for audio operations
pub fn setup_logger() {
    // Users can override via `RUST_LOG`, e.g. `RUST_LOG=debug` when troubleshooting.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .unwrap_or(()); // Ignore initialization errors
}

fn connect(
    stream: Option<Stream>,
    channels: usize,
    sample_rate: u32,
    ring_capacity: usize,
) -> (AudioOutput, RenderContext) {
    // Control thread -> audio thread
    let (producer_in, consumer_in) = RingBuffer::new(ring_capacity);

    // Audio thread -> control thread
    let (producer_out, consumer_out) = RingBuffer::new(ring_capacity);

    let clock = AudioClock::new(sample_rate);
    let player = RtPlayer::new(channels, clock.clone());

    (
        AudioOutput {
            stream,
            producer: producer_in,
            consumer: consumer_out,
            clock,
            channels,
            sample_rate,
        },
        RenderContext {
            player,
            consumer: consumer_in,
            producer: producer_out,
        },
    )
}

/// Create, configure and start the default device's output stream
///
/// This function:
/// 1. Sets up the default audio device
/// 2. Configures the stream with appropriate parameters
/// 3. Creates ring buffers for message passing
/// 4. Moves the player into the audio callback
/// 5. Starts the stream
pub fn create_audio_stream(config: &EngineConfig) -> Result<AudioOutput, StreamError> {
    setup_logger();

    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(StreamError::NoDevice)?;

    let default_config = device.default_output_config()?;
    let sample_rate = config.sample_rate.unwrap_or(default_config.sample_rate());
    let channels = default_config.channels();

    log::info!(
        "Starting AudioEngine... ({} ch@{} Hz)",
        channels,
        sample_rate
    );

    let (mut output, mut context) =
        connect(None, channels as usize, sample_rate, config.ring_capacity);

    let stream_config = StreamConfig {
        channels,
        sample_rate,
        buffer_size: BufferSize::Fixed(config.buffer_frames),
    };

    let error_clock = output.clock.clone();
    let stream = device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            context.process(data);
        },
        move |err| {
            log::error!("Audio stream error: {}", err);
            error_clock.set_running(false);
        },
        None,
    )?;

    stream.play()?;
    output.stream = Some(stream);
    Ok(output)
}
