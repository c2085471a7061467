//! Linear control position <-> logarithmic frequency mapping.
//!
//! Pitch perception is logarithmic, so a slider travelling `0..=100` is mapped
//! exponentially onto `min..=max` Hz: equal travel covers equal frequency ratios.

use crate::audio_engine::constants::{MAX_FREQ_HZ, MIN_FREQ_HZ, POSITION_MAX};
use crate::audio_engine::errors::FrequencyMapError;

fn validate_range(min: f64, max: f64) -> Result<(), FrequencyMapError> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= min {
        return Err(FrequencyMapError::InvalidRange { min, max });
    }
    Ok(())
}

/// Maps a control position in `[0, 100]` to a frequency in `[min, max]`.
pub fn to_frequency(position: f64, min: f64, max: f64) -> Result<f64, FrequencyMapError> {
    validate_range(min, max)?;
    let (ln_min, ln_max) = (min.ln(), max.ln());
    Ok((ln_min + position * (ln_max - ln_min) / POSITION_MAX).exp())
}

/// Maps a frequency in `[min, max]` back to a control position in `[0, 100]`.
///
/// Exact inverse of [`to_frequency`].
pub fn to_position(frequency_hz: f64, min: f64, max: f64) -> Result<f64, FrequencyMapError> {
    validate_range(min, max)?;
    let (ln_min, ln_max) = (min.ln(), max.ln());
    Ok(POSITION_MAX * (frequency_hz.ln() - ln_min) / (ln_max - ln_min))
}

/// A validated logarithmic scale, so callers check the range once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    min: f64,
    max: f64,
}

impl LogScale {
    /// The audible range the filter chain operates on.
    pub const AUDIBLE: LogScale = LogScale {
        min: MIN_FREQ_HZ as f64,
        max: MAX_FREQ_HZ as f64,
    };

    pub fn new(min: f64, max: f64) -> Result<Self, FrequencyMapError> {
        validate_range(min, max)?;
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn frequency(&self, position: f64) -> f64 {
        let (ln_min, ln_max) = (self.min.ln(), self.max.ln());
        (ln_min + position * (ln_max - ln_min) / POSITION_MAX).exp()
    }

    pub fn position(&self, frequency_hz: f64) -> f64 {
        let (ln_min, ln_max) = (self.min.ln(), self.max.ln());
        POSITION_MAX * (frequency_hz.ln() - ln_min) / (ln_max - ln_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rel_eq(actual: f64, expected: f64, rel: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= rel * scale,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_endpoints_map_to_bounds() {
        assert_rel_eq(to_frequency(0.0, 20.0, 20_000.0).unwrap(), 20.0, 1e-12);
        assert_rel_eq(
            to_frequency(100.0, 20.0, 20_000.0).unwrap(),
            20_000.0,
            1e-12,
        );
    }

    #[test]
    fn test_midpoint_is_geometric_mean() {
        let mid = to_frequency(50.0, 20.0, 20_000.0).unwrap();
        assert_rel_eq(mid, (20.0f64 * 20_000.0).sqrt(), 1e-9);
    }

    #[test]
    fn test_round_trip_over_control_range() {
        for step in 0..=1000 {
            let p = step as f64 / 10.0;
            let f = to_frequency(p, 20.0, 20_000.0).unwrap();
            let back = to_position(f, 20.0, 20_000.0).unwrap();
            assert_rel_eq(back, p, 1e-6);
        }
    }

    #[test]
    fn test_monotonic_increasing() {
        let mut previous = 0.0;
        for step in 0..=100 {
            let f = to_frequency(step as f64, 20.0, 20_000.0).unwrap();
            assert!(f > previous);
            previous = f;
        }
    }

    #[test]
    fn test_invalid_ranges_are_rejected() {
        assert!(matches!(
            to_frequency(10.0, 0.0, 100.0),
            Err(FrequencyMapError::InvalidRange { .. })
        ));
        assert!(matches!(
            to_frequency(10.0, -5.0, 100.0),
            Err(FrequencyMapError::InvalidRange { .. })
        ));
        assert!(matches!(
            to_position(440.0, 1000.0, 1000.0),
            Err(FrequencyMapError::InvalidRange { .. })
        ));
        assert!(matches!(
            to_position(440.0, 1000.0, 20.0),
            Err(FrequencyMapError::InvalidRange { .. })
        ));
        assert!(LogScale::new(f64::NAN, 100.0).is_err());
    }

    #[test]
    fn test_log_scale_matches_free_functions() {
        let scale = LogScale::AUDIBLE;
        for p in [0.0, 12.5, 33.3, 75.0, 100.0] {
            assert_rel_eq(
                scale.frequency(p),
                to_frequency(p, 20.0, 20_000.0).unwrap(),
                1e-12,
            );
        }
        assert_rel_eq(scale.position(1_000.0), to_position(1_000.0, 20.0, 20_000.0).unwrap(), 1e-12);
    }
}
