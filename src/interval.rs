use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalKind {
    Static,
    Dynamic,
    /// Dynamic interval too brief to be usable.
    ShortDynamic,
}

impl IntervalKind {
    /// Numeric code used in exported tables.
    pub fn code(self) -> i32 {
        match self {
            IntervalKind::Static => 1,
            IntervalKind::Dynamic => -1,
            IntervalKind::ShortDynamic => -2,
        }
    }

}

/// Closed index range `[start, end]` with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
    pub kind: IntervalKind,
    /// Relative weight among static intervals; 0 for the other kinds.
    /// Larger means quieter.
    pub quality: f64,
    pub reserved: f64,
}

impl Interval {
    pub fn new(start: i64, end: i64, kind: IntervalKind) -> Self {
        Self {
            start,
            end,
            kind,
            quality: 0.0,
            reserved: 0.0,
        }
    }

    /// Number of indices covered, both ends included.
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}
