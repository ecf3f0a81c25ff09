use log::info;

use crate::detector::estimator::MagnitudeSequence;
use crate::error::DetectError;

/// Log magnitude of a window with zero variance, `log10(1.0)`.
pub const ACTIVATION_REFERENCE: f64 = 0.0;

/// Mean of all log magnitudes above the activation reference.
///
/// The mean is accumulated incrementally, so a run of identical values
/// yields exactly that value and none of them lands above the threshold.
pub fn estimate_threshold(mags: &MagnitudeSequence) -> Result<f64, DetectError> {
    let mut mean = 0.0;
    let mut count = 0u64;

    for value in mags.log_values().filter(|&v| v > ACTIVATION_REFERENCE) {
        count += 1;
        mean += (value - mean) / count as f64;
    }

    if count == 0 {
        return Err(DetectError::NoActivitySamples);
    }

    info!("Estimated magnitude threshold: {:.3} ({} active values)", mean, count);
    Ok(mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_active_values() {
        let mags = MagnitudeSequence::from_log_values(&[0.0, 1.0, 0.0, 3.0, 2.0], 0);
        assert!((estimate_threshold(&mags).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_values_are_exact() {
        let v = 0.436_173_921_771_f64;
        let mags = MagnitudeSequence::from_log_values(&vec![v; 997], 0);
        assert_eq!(estimate_threshold(&mags).unwrap(), v);
    }

    #[test]
    fn test_no_activity() {
        let mags = MagnitudeSequence::from_log_values(&[0.0; 10], 0);
        assert_eq!(estimate_threshold(&mags), Err(DetectError::NoActivitySamples));
        let empty = MagnitudeSequence::from_log_values(&[], 0);
        assert_eq!(estimate_threshold(&empty), Err(DetectError::NoActivitySamples));
    }
}
