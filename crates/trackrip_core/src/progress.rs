//! Progress normalization.
//!
//! Raw engine samples are noisy: the percentage may be missing (unknown
//! input duration), above 100 (rounding in the muxer near the end of a
//! run), or briefly decreasing. Display code wants a bounded integer.

use crate::models::ProgressSample;

/// Convert a raw progress sample into an integer percentage in `[0, 100]`.
///
/// Samples without a completion value normalize to `0` - unknown progress
/// must never abort the pipeline. Out-of-range values are clamped, not
/// rejected.
///
/// Pure function: no state is kept between calls, so non-monotonic engine
/// output passes through as-is (clamped) rather than being smoothed.
pub fn normalize_percent(sample: &ProgressSample) -> u8 {
    match sample.percent {
        Some(percent) => percent.round().clamp(0.0, 100.0) as u8,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(percent: Option<f64>) -> ProgressSample {
        ProgressSample {
            percent,
            ..Default::default()
        }
    }

    #[test]
    fn missing_percent_normalizes_to_zero() {
        assert_eq!(normalize_percent(&sample(None)), 0);
    }

    #[test]
    fn rounds_to_nearest_integer() {
        assert_eq!(normalize_percent(&sample(Some(54.4))), 54);
        assert_eq!(normalize_percent(&sample(Some(54.5))), 55);
        assert_eq!(normalize_percent(&sample(Some(0.4))), 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        // ffmpeg can report slightly past 100% at the end of a run.
        assert_eq!(normalize_percent(&sample(Some(100.4))), 100);
        assert_eq!(normalize_percent(&sample(Some(250.0))), 100);
        assert_eq!(normalize_percent(&sample(Some(-3.0))), 0);
    }

    #[test]
    fn boundaries_pass_through() {
        assert_eq!(normalize_percent(&sample(Some(0.0))), 0);
        assert_eq!(normalize_percent(&sample(Some(100.0))), 100);
    }
}
