//! Audio engine configuration constants and limits.

/// Lowest cutoff frequency the filter chain accepts (Hz).
pub const MIN_FREQ_HZ: f32 = 20.0;

/// Highest cutoff frequency the filter chain accepts (Hz).
pub const MAX_FREQ_HZ: f32 = 20_000.0;

/// Smallest ratio kept between the low and high cutoff (one semitone).
pub const MIN_BAND_RATIO: f32 = 1.059_463_1;

/// Number of cascaded biquad stages on each side of the band.
///
/// Four 12 dB/oct sections give a 48 dB/oct roll-off.
pub const STAGES_PER_SIDE: usize = 4;

/// Resonance of every stage (Butterworth, 1/sqrt(2)).
pub const BUTTERWORTH_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Time constant of the cutoff glide, in seconds.
pub const FREQ_SMOOTHING_TIME_CONSTANT_S: f32 = 0.05;

/// Frames between coefficient updates while a cutoff is gliding.
pub const SMOOTHING_BLOCK_FRAMES: usize = 32;

/// Cutoff distance (Hz) below which a glide snaps to its target.
pub const SMOOTHING_SNAP_HZ: f32 = 0.01;

/// Upper end of the linear control range (the lower end is 0).
pub const POSITION_MAX: f64 = 100.0;

/// Capacity of the control and audio message ring buffers.
pub const RING_CAPACITY: usize = 1024;

/// Requested output buffer size in frames.
pub const OUTPUT_BUFFER_FRAMES: u32 = 512;
