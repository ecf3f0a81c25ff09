use log::debug;

use crate::detector::estimator::MagnitudeSequence;
use crate::error::DetectError;
use crate::interval::{Interval, IntervalKind};

/// Variance of the log magnitude over each static interval's span.
///
/// Spans are in sample coordinates and are mapped back onto the magnitude
/// rows, clamped to the rows that exist.
pub fn static_variances(intervals: &[Interval], mags: &MagnitudeSequence) -> Result<Vec<f64>, DetectError> {
    let last = mags.len() as i64 - 1;

    intervals
        .iter()
        .filter(|iv| iv.kind == IntervalKind::Static)
        .map(|iv| {
            let from = mags.row_index(iv.start).clamp(0, last.max(0)) as usize;
            let to = mags.row_index(iv.end).clamp(0, last.max(0)) as usize;
            mags.log_variance(from, to)
        })
        .collect()
}

/// Turns per-interval variances into weights that sum to one, larger for
/// quieter intervals.
///
/// Weights are inverse-variance. Intervals with zero variance are perfectly
/// quiet and share the whole weight between them.
pub fn inverse_variance_weights(variances: &[f64]) -> Vec<f64> {
    let inverse: Vec<f64> = variances.iter().map(|&v| 1.0 / v).collect();
    let silent = inverse.iter().filter(|w| !w.is_finite()).count();

    if silent > 0 {
        let share = 1.0 / silent as f64;
        return inverse
            .iter()
            .map(|w| if w.is_finite() { 0.0 } else { share })
            .collect();
    }

    let total: f64 = inverse.iter().sum();
    inverse.iter().map(|w| w / total).collect()
}

/// Writes normalized quality weights into the static intervals.
pub fn assign_quality(intervals: &mut [Interval], mags: &MagnitudeSequence) -> Result<(), DetectError> {
    let variances = static_variances(intervals, mags)?;
    if variances.is_empty() {
        return Ok(());
    }

    let weights = inverse_variance_weights(&variances);
    let statics = intervals.iter_mut().filter(|iv| iv.kind == IntervalKind::Static);
    for ((interval, weight), variance) in statics.zip(weights).zip(variances) {
        debug!(
            "Static [{}, {}]: variance {:.6}, weight {:.4}",
            interval.start, interval.end, variance, weight
        );
        interval.quality = weight;
    }
    Ok(())
}
