pub mod args;
pub mod config;
pub mod detector;
pub mod error;
pub mod interval;
pub mod io;
pub mod matrix;
pub mod params;
pub mod sample;
pub mod util;

pub use detector::{AnnotatedSample, Detection, StaticDetector};
pub use error::DetectError;
pub use interval::{Interval, IntervalKind};
pub use params::{DetectorParams, QuietPolicy};
pub use sample::{Sample, SampleTable};
