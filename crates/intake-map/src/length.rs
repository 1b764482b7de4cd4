//! Value-length plausibility.
//!
//! Tolerance is asymmetric: real values (addresses, free text) overshoot an
//! expected maximum far more often than they undershoot a minimum, so the
//! window above `max` is wider and its floor higher.

use intake_model::LengthRange;

const LOW_TOLERANCE_RATIO: f64 = 0.3;
const HIGH_TOLERANCE_RATIO: f64 = 0.8;
/// Lowest score inside the below-minimum window.
pub const LOW_FLOOR: f64 = 0.15;
/// Lowest score inside the above-maximum window.
pub const HIGH_FLOOR: f64 = 0.35;
/// Score for values shorter than the below-minimum window.
pub const TOO_SHORT: f64 = 0.02;
/// Score for values longer than the above-maximum window.
pub const TOO_LONG: f64 = 0.05;

/// Tolerance windows derived from an expected range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    pub low: usize,
    pub high: usize,
}

impl Tolerance {
    pub fn for_range(expected: LengthRange) -> Self {
        let range = expected.max.saturating_sub(expected.min).max(1) as f64;
        Self {
            low: ((range * LOW_TOLERANCE_RATIO).floor() as usize).max(1),
            high: ((range * HIGH_TOLERANCE_RATIO).floor() as usize).max(1),
        }
    }
}

/// Scores `actual` against `expected`: `1.0` in range, decaying within the
/// tolerance windows, then a flat floor outside them.
pub fn length_score(actual: usize, expected: LengthRange) -> f64 {
    if expected.contains(actual) {
        return 1.0;
    }

    let tolerance = Tolerance::for_range(expected);

    if actual < expected.min {
        if actual >= expected.min.saturating_sub(tolerance.low) {
            let distance = (expected.min - actual) as f64;
            return (1.0 - distance / (tolerance.low as f64 + 0.5)).max(LOW_FLOOR);
        }
        return TOO_SHORT;
    }

    // actual > max: every length is in range, below min, or above max.
    if actual <= expected.max.saturating_add(tolerance.high) {
        let distance = (actual - expected.max) as f64;
        return (1.0 - distance / (tolerance.high as f64 + 1.0)).max(HIGH_FLOOR);
    }
    TOO_LONG
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn in_range_scores_one() {
        let range = LengthRange::new(10, 15);
        for actual in 10..=15 {
            assert_eq!(length_score(actual, range), 1.0);
        }
    }

    #[test]
    fn tolerance_windows() {
        assert_eq!(
            Tolerance::for_range(LengthRange::new(10, 10)),
            Tolerance { low: 1, high: 1 }
        );
        assert_eq!(
            Tolerance::for_range(LengthRange::new(10, 200)),
            Tolerance { low: 57, high: 152 }
        );
        assert_eq!(
            Tolerance::for_range(LengthRange::new(2, 30)),
            Tolerance { low: 8, high: 22 }
        );
    }

    #[test]
    fn below_min_decays_then_fails() {
        let dob = LengthRange::new(10, 10);
        assert!(approx(length_score(9, dob), 1.0 - 1.0 / 1.5));
        assert_eq!(length_score(8, dob), TOO_SHORT);
        assert_eq!(length_score(0, dob), TOO_SHORT);
    }

    #[test]
    fn below_min_clamps_to_floor() {
        // low tolerance 8: distance 8 gives 1 - 8/8.5 < 0.15
        let name = LengthRange::new(10, 38);
        assert!(approx(length_score(9, name), 1.0 - 1.0 / 8.5));
        assert!(approx(length_score(3, name), 1.0 - 7.0 / 8.5));
        assert_eq!(length_score(2, name), LOW_FLOOR);
        assert_eq!(length_score(1, name), TOO_SHORT);
    }

    #[test]
    fn above_max_decays_then_fails() {
        let dob = LengthRange::new(10, 10);
        assert!(approx(length_score(11, dob), 0.5));
        assert_eq!(length_score(12, dob), TOO_LONG);

        let postcode = LengthRange::new(5, 8);
        // high tolerance 2
        assert!(approx(length_score(9, postcode), 1.0 - 1.0 / 3.0));
        assert_eq!(length_score(10, postcode), HIGH_FLOOR);
        assert_eq!(length_score(11, postcode), TOO_LONG);
    }

    #[test]
    fn zero_minimum_never_reports_too_short() {
        let range = LengthRange::new(0, 3);
        assert_eq!(length_score(0, range), 1.0);
        assert_eq!(length_score(100, range), TOO_LONG);
    }
}
