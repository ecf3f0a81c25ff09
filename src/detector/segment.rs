use log::debug;

use crate::detector::estimator::MagnitudeSequence;
use crate::error::DetectError;
use crate::interval::{Interval, IntervalKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    InStatic { start: i64 },
}

/// Walks the magnitude sequence and cuts it into alternating raw static and
/// dynamic intervals, in magnitude-sequence coordinates.
pub struct SegmentBuilder {
    pub threshold: f64,
    pub min_static_len: i64,
    pub max_intervals: Option<usize>,
}

/// Ordered output with optional size cap.
struct IntervalSink {
    intervals: Vec<Interval>,
    limit: Option<usize>,
}

impl IntervalSink {
    fn push(&mut self, interval: Interval) -> Result<(), DetectError> {
        if let Some(limit) = self.limit {
            if self.intervals.len() >= limit {
                return Err(DetectError::TooManyIntervals { limit });
            }
        }
        self.intervals.push(interval);
        Ok(())
    }
}

impl SegmentBuilder {
    pub fn new(threshold: f64, min_static_len: i64, max_intervals: Option<usize>) -> Self {
        Self {
            threshold,
            min_static_len,
            max_intervals,
        }
    }

    /// Output tiles `[0, mags.len() - 1]` exactly.
    pub fn build(&self, mags: &MagnitudeSequence) -> Result<Vec<Interval>, DetectError> {
        let mut sink = IntervalSink {
            intervals: Vec::new(),
            limit: self.max_intervals,
        };
        let mut state = ScanState::Idle;
        // First index not covered by a committed static run.
        let mut dyn_start = 0i64;

        for (i, value) in mags.log_values().enumerate() {
            let i = i as i64;
            match state {
                ScanState::Idle if value <= self.threshold => {
                    state = ScanState::InStatic { start: i };
                }
                ScanState::InStatic { start } if value > self.threshold => {
                    self.close_run(&mut sink, &mut dyn_start, start, i - 1)?;
                    state = ScanState::Idle;
                }
                _ => {}
            }
        }

        let last = mags.len() as i64 - 1;
        if let ScanState::InStatic { start } = state {
            self.close_run(&mut sink, &mut dyn_start, start, last)?;
        }
        if dyn_start <= last {
            sink.push(Interval::new(dyn_start, last, IntervalKind::Dynamic))?;
        }

        Ok(sink.intervals)
    }

    /// Commits `[start, end]` as static if long enough; a shorter run stays
    /// part of the pending dynamic stretch.
    fn close_run(
        &self,
        sink: &mut IntervalSink,
        dyn_start: &mut i64,
        start: i64,
        end: i64,
    ) -> Result<(), DetectError> {
        let len = end - start + 1;
        if len < self.min_static_len {
            debug!("Discarding static run [{}, {}] of {} values", start, end, len);
            return Ok(());
        }

        if *dyn_start < start {
            sink.push(Interval::new(*dyn_start, start - 1, IntervalKind::Dynamic))?;
        }
        sink.push(Interval::new(start, end, IntervalKind::Static))?;
        *dyn_start = end + 1;
        Ok(())
    }
}
