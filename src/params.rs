use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DetectError;

/// Full-scale offset of a 16-bit accelerometer reading.
pub const DEFAULT_BIAS_SHIFT: f64 = 32676.0;

/// What to do when no magnitude value rises above the activation reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuietPolicy {
    /// Fail with `NoActivitySamples`.
    #[default]
    Reject,
    /// Classify the whole eligible range as one static interval.
    Static,
}

impl FromStr for QuietPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(QuietPolicy::Reject),
            "static" => Ok(QuietPolicy::Static),
            other => Err(format!("Unknown quiet policy '{}', expected 'reject' or 'static'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Variance window length in seconds.
    pub time_window: f64,
    /// Shortest static interval kept, in seconds.
    pub min_static: f64,
    /// Dynamic intervals shorter than this, in seconds, are marked short.
    pub min_dynamic: f64,
    /// Constant subtracted from every accelerometer value before variance.
    pub bias_shift: f64,
    pub quiet_policy: QuietPolicy,
    /// Optional cap on the number of raw intervals.
    pub max_intervals: Option<usize>,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            time_window: 0.5,
            min_static: 1.0,
            min_dynamic: 0.4,
            bias_shift: DEFAULT_BIAS_SHIFT,
            quiet_policy: QuietPolicy::Reject,
            max_intervals: None,
        }
    }
}

impl DetectorParams {
    pub fn validate(&self) -> Result<(), DetectError> {
        let positive = [
            ("time window", self.time_window),
            ("min static length", self.min_static),
            ("min dynamic length", self.min_dynamic),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(DetectError::InvalidParameter(format!(
                    "{} must be a positive number of seconds, got {}",
                    name, value
                )));
            }
        }
        if !self.bias_shift.is_finite() {
            return Err(DetectError::InvalidParameter(format!(
                "bias shift must be finite, got {}",
                self.bias_shift
            )));
        }
        if self.max_intervals == Some(0) {
            return Err(DetectError::InvalidParameter(
                "interval limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
