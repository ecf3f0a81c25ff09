use thiserror::Error;

/// Reasons a detection call can fail. Any of these aborts the whole call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("no activity samples: no magnitude value exceeds the activation reference")]
    NoActivitySamples,
    #[error("too many intervals: limit of {limit} exceeded")]
    TooManyIntervals { limit: usize },
    #[error("column {column} is out of range for a buffer with {cols} columns")]
    InvalidColumn { column: usize, cols: usize },
    #[error("index range {from}..={to} is invalid for a buffer with {rows} rows")]
    InvalidIndexRange { from: usize, to: usize, rows: usize },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl DetectError {
    /// Process exit code used by the command-line harness.
    pub fn exit_code(&self) -> i32 {
        match self {
            DetectError::InsufficientData(_) => 2,
            DetectError::NoActivitySamples => 3,
            DetectError::TooManyIntervals { .. } => 4,
            DetectError::InvalidParameter(_) => 5,
            DetectError::InvalidColumn { .. } | DetectError::InvalidIndexRange { .. } => 70,
        }
    }
}
