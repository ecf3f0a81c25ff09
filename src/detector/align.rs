use log::debug;

use crate::detector::estimator::WindowLayout;
use crate::interval::{Interval, IntervalKind};

/// Moves raw interval borders from magnitude coordinates into sample
/// coordinates and compensates for the lag of the symmetric window.
///
/// Static intervals shrink by `shift` on both ends, dynamic ones grow by the
/// same amount. Results are clamped to the table, and any overlap created by
/// a collapsed static interval is taken out of its dynamic neighbour.
pub struct BoundaryAligner {
    pub shift: i64,
    pub half_window: i64,
    pub sample_count: i64,
    pub min_dynamic_len: i64,
}

impl BoundaryAligner {
    pub fn new(window: &WindowLayout) -> Self {
        Self {
            shift: window.shift,
            half_window: window.half_window,
            sample_count: window.sample_count,
            min_dynamic_len: window.min_dynamic_len,
        }
    }

    pub fn align(&self, raw: &[Interval]) -> Vec<Interval> {
        let mut aligned: Vec<Interval> = Vec::with_capacity(raw.len());

        for interval in raw {
            let mut current = self.shift_and_clamp(interval);

            while let Some(prev) = aligned.last_mut() {
                if current.start > prev.end {
                    break;
                }
                if prev.kind != IntervalKind::Static && current.kind == IntervalKind::Static {
                    prev.end = current.start - 1;
                    if prev.is_empty() {
                        debug!("Dropping dynamic interval swallowed by static [{}, {}]", current.start, current.end);
                        aligned.pop();
                    }
                } else {
                    current.start = prev.end + 1;
                    break;
                }
            }

            if current.is_empty() {
                debug!("Dropping {:?} interval fully covered by its predecessor", current.kind);
                continue;
            }
            aligned.push(current);
        }

        for interval in aligned.iter_mut() {
            if interval.kind == IntervalKind::Dynamic && interval.len() < self.min_dynamic_len {
                interval.kind = IntervalKind::ShortDynamic;
            }
        }

        aligned
    }

    fn shift_and_clamp(&self, raw: &Interval) -> Interval {
        let mut start = raw.start + self.half_window;
        let mut end = raw.end + self.half_window;

        match raw.kind {
            IntervalKind::Static => {
                start += self.shift;
                end -= self.shift;
            }
            IntervalKind::Dynamic | IntervalKind::ShortDynamic => {
                start -= self.shift;
                end += self.shift;
            }
        }

        let last = self.sample_count - 1;
        start = start.clamp(0, last);
        end = end.clamp(0, last);
        if start > end {
            start = (end - 1).max(0);
        }

        Interval { start, end, ..*raw }
    }
}
