//! Numeric policy of the conversion.
//!
//! osu! cannot represent a zero or negative tempo, nor a zero or negative scroll speed. Such values
//! are legal in Quaver, so they are replaced by [`NON_POSITIVE_SENTINEL`]: a finite beat length so
//! long that osu! shows the tempo as zero, and a velocity that osu! clamps to its slowest speed.
//! Infinite inputs, and inputs so small that the division overflows, get the same sentinel, so
//! every value written is finite. Both guards live here and nowhere else.

use std::fmt;

use crate::osu::PLAYFIELD_WIDTH;

/// Value written in place of a beat length or velocity computed from a non-positive input.
pub const NON_POSITIVE_SENTINEL: f64 = -1e11;

// `f(input)` if both are finite and `input` is positive.
fn guarded(input: f64, f: impl FnOnce(f64) -> f64) -> f64 {
    if input > 0.0 && input.is_finite() {
        let output = f(input);
        if output.is_finite() {
            return output;
        }
    }
    NON_POSITIVE_SENTINEL
}

/// Milliseconds per beat of `bpm`, or [`NON_POSITIVE_SENTINEL`] if `bpm` is not positive.
///
/// ```
/// use qua2osu::convert::numeric::{NON_POSITIVE_SENTINEL, beat_length};
///
/// assert_eq!(beat_length(120.0), 500.0);
/// assert_eq!(beat_length(0.0), NON_POSITIVE_SENTINEL);
/// ```
#[must_use]
pub fn beat_length(bpm: f64) -> f64 {
    guarded(bpm, |bpm| 60000.0 / bpm)
}

/// Beat length of an inherited timing point, the negative inverse of `multiplier` in percent,
/// or [`NON_POSITIVE_SENTINEL`] if `multiplier` is not positive.
///
/// ```
/// use qua2osu::convert::numeric::{NON_POSITIVE_SENTINEL, velocity_factor};
///
/// assert_eq!(velocity_factor(2.0), -50.0);
/// assert_eq!(velocity_factor(-1.0), NON_POSITIVE_SENTINEL);
/// ```
#[must_use]
pub fn velocity_factor(multiplier: f64) -> f64 {
    guarded(multiplier, |multiplier| -100.0 / multiplier)
}

/// Horizontal osu!pixel position of `lane` (1-based) among `key_count` columns.
///
/// Not clamped: a lane outside `1..=key_count` yields a position outside the playfield.
#[must_use]
pub fn column_x(lane: i64, key_count: u8) -> i64 {
    ((lane as f64 / f64::from(key_count)) * PLAYFIELD_WIDTH).floor() as i64 - 64
}

/// Displays a float the way osu! beatmaps usually spell them: whole values keep one decimal
/// (`500.0`), the others use the shortest exact representation (`333.3333333333333`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OsuFloat(pub f64);

impl fmt::Display for OsuFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Displays a time in milliseconds without a fraction when it is whole (`1000`, `1234.5`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OsuTime(pub f64);

impl fmt::Display for OsuTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_bpm() {
        for bpm in [0.0, -0.0, -1.0, -120.0, f64::MIN, f64::NAN] {
            assert_eq!(beat_length(bpm), NON_POSITIVE_SENTINEL, "bpm {bpm}");
        }
    }

    #[test]
    fn positive_bpm() {
        for bpm in [1.0, 60.0, 120.0, 180.0, 333.0, 0.000_006] {
            assert!((beat_length(bpm) - 60000.0 / bpm).abs() <= f64::EPSILON * 60000.0 / bpm);
        }
        assert_eq!(beat_length(240.0), 250.0);
    }

    #[test]
    fn non_positive_multiplier() {
        for multiplier in [0.0, -0.0, -0.5, -10.0, f64::NAN] {
            assert_eq!(
                velocity_factor(multiplier),
                NON_POSITIVE_SENTINEL,
                "multiplier {multiplier}"
            );
        }
    }

    #[test]
    fn positive_multiplier() {
        assert_eq!(velocity_factor(1.0), -100.0);
        assert_eq!(velocity_factor(0.5), -200.0);
        assert_eq!(velocity_factor(4.0), -25.0);
        assert!(velocity_factor(0.01) < 0.0);
    }

    #[test]
    fn results_stay_finite() {
        for bpm in [5e-324, f64::MIN_POSITIVE, f64::INFINITY] {
            assert_eq!(beat_length(bpm), NON_POSITIVE_SENTINEL, "bpm {bpm}");
        }
        for multiplier in [5e-324, f64::INFINITY] {
            assert_eq!(
                velocity_factor(multiplier),
                NON_POSITIVE_SENTINEL,
                "multiplier {multiplier}"
            );
        }
        assert_eq!(beat_length(f64::MAX), 60000.0 / f64::MAX);
    }

    #[test]
    fn columns_of_four_keys() {
        assert_eq!(column_x(1, 4), 64);
        assert_eq!(column_x(2, 4), 192);
        assert_eq!(column_x(3, 4), 320);
        assert_eq!(column_x(4, 4), 448);
    }

    #[test]
    fn columns_of_seven_keys() {
        let xs: Vec<_> = (1..=7).map(|lane| column_x(lane, 7)).collect();
        assert_eq!(xs, vec![9, 82, 155, 228, 301, 374, 448]);
        // osu!mania reads the column back as floor(x * keys / 512).
        for (column, x) in xs.into_iter().enumerate() {
            assert_eq!((x * 7 / 512) as usize, column);
        }
    }

    #[test]
    fn lanes_outside_playfield_are_not_clamped() {
        assert_eq!(column_x(0, 4), -64);
        assert_eq!(column_x(5, 4), 576);
        assert_eq!(column_x(-1, 4), -192);
    }

    #[test]
    fn float_display() {
        assert_eq!(OsuFloat(500.0).to_string(), "500.0");
        assert_eq!(OsuFloat(NON_POSITIVE_SENTINEL).to_string(), "-100000000000.0");
        assert_eq!(OsuFloat(-50.0).to_string(), "-50.0");
        assert_eq!(OsuFloat(60000.0 / 180.0).to_string(), "333.3333333333333");
        assert_eq!(OsuFloat(-100.0 / 0.75).to_string(), "-133.33333333333334");
    }

    #[test]
    fn time_display() {
        assert_eq!(OsuTime(0.0).to_string(), "0");
        assert_eq!(OsuTime(1000.0).to_string(), "1000");
        assert_eq!(OsuTime(1234.5).to_string(), "1234.5");
        assert_eq!(OsuTime(-30.0).to_string(), "-30");
    }
}
