pub mod align;
pub mod estimator;
pub mod quality;
pub mod segment;
pub mod threshold;

use log::{debug, info, warn};

use crate::error::DetectError;
use crate::interval::{Interval, IntervalKind};
use crate::params::{DetectorParams, QuietPolicy};
use crate::sample::{Sample, SampleTable};

use align::BoundaryAligner;
use estimator::{MagnitudeSequence, WindowLayout};
use segment::SegmentBuilder;
use threshold::{estimate_threshold, ACTIVATION_REFERENCE};

/// A sample together with the type of the interval it fell in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedSample {
    pub sample: Sample,
    pub label: IntervalKind,
}

#[derive(Debug, Clone)]
pub struct Detection {
    pub window: WindowLayout,
    /// Adaptive threshold on the log magnitude.
    pub threshold: f64,
    /// Aligned intervals in sample coordinates, ordered and disjoint.
    pub intervals: Vec<Interval>,
    pub annotated: Vec<AnnotatedSample>,
}

impl Detection {
    pub fn static_count(&self) -> usize {
        self.intervals
            .iter()
            .filter(|iv| iv.kind == IntervalKind::Static)
            .count()
    }
}

pub struct StaticDetector {
    params: DetectorParams,
}

impl StaticDetector {
    pub fn new(params: DetectorParams) -> Result<Self, DetectError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn detect(&self, table: &SampleTable) -> Result<Detection, DetectError> {
        let window = WindowLayout::from_table(table, &self.params)?;
        info!(
            "Time window of {:.2}s is {} records (half window {}, shift {}), min static {} / min dynamic {} records",
            self.params.time_window,
            window.w_len,
            window.half_window,
            window.shift,
            window.min_static_len,
            window.min_dynamic_len
        );

        let mags = MagnitudeSequence::estimate(table, &window, self.params.bias_shift)?;

        let (threshold, raw) = match estimate_threshold(&mags) {
            Ok(threshold) => {
                let builder = SegmentBuilder::new(threshold, window.min_static_len, self.params.max_intervals);
                (threshold, builder.build(&mags)?)
            }
            Err(DetectError::NoActivitySamples) if self.params.quiet_policy == QuietPolicy::Static => {
                warn!("No activity above the reference; treating the whole recording as static");
                let whole = Interval::new(0, mags.len() as i64 - 1, IntervalKind::Static);
                (ACTIVATION_REFERENCE, vec![whole])
            }
            Err(e) => return Err(e),
        };
        debug!("Segment builder produced {} raw intervals", raw.len());

        let mut intervals = BoundaryAligner::new(&window).align(&raw);
        quality::assign_quality(&mut intervals, &mags)?;

        let annotated = annotate(table, &intervals)?;

        Ok(Detection {
            window,
            threshold,
            intervals,
            annotated,
        })
    }
}

fn annotate(table: &SampleTable, intervals: &[Interval]) -> Result<Vec<AnnotatedSample>, DetectError> {
    let covered: i64 = intervals.iter().map(Interval::len).sum();
    let mut rows = Vec::with_capacity(covered.max(0) as usize);
    for interval in intervals {
        for index in interval.start..=interval.end {
            rows.push(AnnotatedSample {
                sample: table.sample(index as usize)?,
                label: interval.kind,
            });
        }
    }
    Ok(rows)
}
