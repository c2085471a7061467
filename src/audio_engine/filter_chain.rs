//! Cascaded band-pass filter chain.
//!
//! Four Butterworth high-pass sections followed by four Butterworth low-pass
//! sections, each side 48 dB/oct. Every stage on a side shares one cutoff.
//! Cutoff changes glide exponentially towards their target so coefficient
//! updates never jump.

use crate::audio_engine::biquad::{BiquadCoeffs, BiquadState, FilterKind, biquad_process};
use crate::audio_engine::constants::{
    MAX_FREQ_HZ, MIN_BAND_RATIO, MIN_FREQ_HZ,
    SMOOTHING_BLOCK_FRAMES, SMOOTHING_SNAP_HZ, STAGES_PER_SIDE,
};

/// The pass band applied to the chain.
///
/// Invariant: `MIN_FREQ_HZ <= low_hz < high_hz <= MAX_FREQ_HZ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRange {
    low_hz: f32,
    high_hz: f32,
}

impl FrequencyRange {
    /// Nothing cut.
    pub const FULL: FrequencyRange = FrequencyRange {
        low_hz: MIN_FREQ_HZ,
        high_hz: MAX_FREQ_HZ,
    };

    /// Builds a valid range from raw control input.
    ///
    /// Values are clamped to the audible range and non-finite values fall back
    /// to `previous`. If the result is inverted or empty, the handle that moved
    /// is stopped one semitone short of its sibling; when both moved the high
    /// cut wins.
    pub fn corrected(low_hz: f32, high_hz: f32, previous: FrequencyRange) -> Self {
        let low = if low_hz.is_finite() {
            low_hz.clamp(MIN_FREQ_HZ, MAX_FREQ_HZ)
        } else {
            previous.low_hz
        };
        let high = if high_hz.is_finite() {
            high_hz.clamp(MIN_FREQ_HZ, MAX_FREQ_HZ)
        } else {
            previous.high_hz
        };

        if low < high {
            return Self {
                low_hz: low,
                high_hz: high,
            };
        }

        let only_high_moved = high != previous.high_hz && low == previous.low_hz;
        let (low_hz, high_hz) = if only_high_moved {
            let high = low * MIN_BAND_RATIO;
            if high <= MAX_FREQ_HZ {
                (low, high)
            } else {
                (MAX_FREQ_HZ / MIN_BAND_RATIO, MAX_FREQ_HZ)
            }
        } else {
            let low = high / MIN_BAND_RATIO;
            if low >= MIN_FREQ_HZ {
                (low, high)
            } else {
                (MIN_FREQ_HZ, MIN_FREQ_HZ * MIN_BAND_RATIO)
            }
        };

        Self { low_hz, high_hz }
    }

    pub fn low_hz(&self) -> f32 {
        self.low_hz
    }

    pub fn high_hz(&self) -> f32 {
        self.high_hz
    }
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// One second-order section of the chain.
pub struct FilterStage {
    kind: FilterKind,
    sample_rate: f32,
    current_hz: f32,
    target_hz: f32,
    /// Fraction of the remaining distance covered per smoothing block.
    glide: f32,
    coeffs: BiquadCoeffs,
    states: Vec<BiquadState>,
}

impl FilterStage {
    pub fn new(
        kind: FilterKind,
        sample_rate: f32,
        channels: usize,
        freq_hz: f32,
        time_constant_s: f32,
    ) -> Self {
        let block_s = SMOOTHING_BLOCK_FRAMES as f32 / sample_rate;
        let glide = if time_constant_s.is_finite() && time_constant_s > 0.0 {
            1.0 - (-block_s / time_constant_s).exp()
        } else {
            1.0
        };

        Self {
            kind,
            sample_rate,
            current_hz: freq_hz,
            target_hz: freq_hz,
            glide: if glide.is_finite() { glide } else { 1.0 },
            coeffs: BiquadCoeffs::butterworth(kind, sample_rate, freq_hz),
            states: vec![BiquadState::default(); channels.max(1)],
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn current_hz(&self) -> f32 {
        self.current_hz
    }

    pub fn target_hz(&self) -> f32 {
        self.target_hz
    }

    pub fn set_target_hz(&mut self, freq_hz: f32) {
        self.target_hz = freq_hz;
    }

    /// Moves the cutoff one smoothing block towards its target.
    fn advance_glide(&mut self) {
        if self.current_hz == self.target_hz {
            return;
        }

        let delta = self.target_hz - self.current_hz;
        if delta.abs() <= SMOOTHING_SNAP_HZ {
            self.current_hz = self.target_hz;
        } else {
            self.current_hz += delta * self.glide;
        }
        self.coeffs = BiquadCoeffs::butterworth(self.kind, self.sample_rate, self.current_hz);
    }

    #[inline]
    fn process(&mut self, channel: usize, x: f32) -> f32 {
        biquad_process(self.coeffs, &mut self.states[channel], x)
    }
}

/// Four high-pass stages in series, then four low-pass stages in series.
pub struct FilterChain {
    channels: usize,
    range: FrequencyRange,
    high_pass: [FilterStage; STAGES_PER_SIDE],
    low_pass: [FilterStage; STAGES_PER_SIDE],
}

impl FilterChain {
    pub fn new(
        sample_rate: u32,
        channels: usize,
        range: FrequencyRange,
        time_constant_s: f32,
    ) -> Self {
        let fs = sample_rate as f32;
        let channels = channels.max(1);
        Self {
            channels,
            range,
            high_pass: std::array::from_fn(|_| {
                FilterStage::new(
                    FilterKind::HighPass,
                    fs,
                    channels,
                    range.low_hz(),
                    time_constant_s,
                )
            }),
            low_pass: std::array::from_fn(|_| {
                FilterStage::new(
                    FilterKind::LowPass,
                    fs,
                    channels,
                    range.high_hz(),
                    time_constant_s,
                )
            }),
        }
    }

    /// Last range handed to the chain (the glide target).
    pub fn range(&self) -> FrequencyRange {
        self.range
    }

    /// Retargets every high-pass stage to `low_hz` and every low-pass stage to `high_hz`.
    pub fn set_range(&mut self, range: FrequencyRange) {
        self.range = range;
        for stage in &mut self.high_pass {
            stage.set_target_hz(range.low_hz());
        }
        for stage in &mut self.low_pass {
            stage.set_target_hz(range.high_hz());
        }
    }

    pub fn stages(&self) -> impl Iterator<Item = &FilterStage> {
        self.high_pass.iter().chain(self.low_pass.iter())
    }

    fn stages_mut(&mut self) -> impl Iterator<Item = &mut FilterStage> {
        self.high_pass.iter_mut().chain(self.low_pass.iter_mut())
    }

    /// Filters an interleaved buffer in place.
    pub fn process_interleaved(&mut self, data: &mut [f32]) {
        let channels = self.channels;
        for block in data.chunks_mut(SMOOTHING_BLOCK_FRAMES * channels) {
            for stage in self.stages_mut() {
                stage.advance_glide();
            }

            for frame in block.chunks_exact_mut(channels) {
                for (channel, sample) in frame.iter_mut().enumerate() {
                    let mut x = *sample;
                    for stage in &mut self.high_pass {
                        x = stage.process(channel, x);
                    }
                    for stage in &mut self.low_pass {
                        x = stage.process(channel, x);
                    }
                    *sample = x;
                }
            }
        }
    }
}
