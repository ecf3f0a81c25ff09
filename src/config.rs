use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use knuffel::Decode;
use std::path::{Path, PathBuf};

use crate::params::{DetectorParams, QuietPolicy};
use crate::util::delimiter_parser;

/// Optional `config.kdl`:
///
/// ```kdl
/// detector time-window=0.5 min-static=1.0 min-dynamic=0.4 bias-shift=32676.0 quiet="reject"
/// output intervals="intervals.csv" samples="out.csv" delimiter=" "
/// ```
///
/// Second-valued and bias properties are KDL decimals: `min-static=2.0`, not
/// `min-static=2`.
#[derive(Decode, Debug, Clone, Default)]
pub struct ImuStaticConfig {
    #[knuffel(child)]
    pub detector: Option<DetectorSection>,
    #[knuffel(child)]
    pub output: Option<OutputSection>,
}

#[derive(Decode, Debug, Clone, Default)]
pub struct DetectorSection {
    #[knuffel(property(name = "time-window"))]
    pub time_window: Option<f64>,
    #[knuffel(property(name = "min-static"))]
    pub min_static: Option<f64>,
    #[knuffel(property(name = "min-dynamic"))]
    pub min_dynamic: Option<f64>,
    #[knuffel(property(name = "bias-shift"))]
    pub bias_shift: Option<f64>,
    #[knuffel(property)]
    pub quiet: Option<String>,
    #[knuffel(property(name = "max-intervals"))]
    pub max_intervals: Option<u64>,
}

#[derive(Decode, Debug, Clone, Default)]
pub struct OutputSection {
    #[knuffel(property)]
    pub intervals: Option<String>,
    #[knuffel(property)]
    pub samples: Option<String>,
    #[knuffel(property)]
    pub delimiter: Option<String>,
}

/// Where and how result tables are written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub intervals: PathBuf,
    pub samples: PathBuf,
    pub delimiter: u8,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            intervals: PathBuf::from("intervals.csv"),
            samples: PathBuf::from("out.csv"),
            delimiter: b' ',
        }
    }
}

impl ImuStaticConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        knuffel::parse("config.kdl", content).context(
            "Invalid config.kdl: check node and property names; time-window, min-static, \
             min-dynamic and bias-shift must be decimals such as 1.0",
        )
    }

    /// `config.kdl` in the per-user config directory, if one exists.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("org", "imu-static", "imu-static")?;
        let path = dirs.config_dir().join("config.kdl");
        path.exists().then_some(path)
    }

    pub fn apply_detector(&self, params: &mut DetectorParams) -> Result<()> {
        let Some(section) = &self.detector else {
            return Ok(());
        };
        if let Some(v) = section.time_window {
            params.time_window = v;
        }
        if let Some(v) = section.min_static {
            params.min_static = v;
        }
        if let Some(v) = section.min_dynamic {
            params.min_dynamic = v;
        }
        if let Some(v) = section.bias_shift {
            params.bias_shift = v;
        }
        if let Some(quiet) = &section.quiet {
            params.quiet_policy = quiet.parse::<QuietPolicy>().map_err(|e| anyhow!(e))?;
        }
        if let Some(limit) = section.max_intervals {
            params.max_intervals = Some(usize::try_from(limit).context("Interval limit does not fit in memory")?);
        }
        Ok(())
    }

    pub fn apply_output(&self, output: &mut OutputSettings) -> Result<()> {
        let Some(section) = &self.output else {
            return Ok(());
        };
        if let Some(path) = &section.intervals {
            output.intervals = PathBuf::from(path);
        }
        if let Some(path) = &section.samples {
            output.samples = PathBuf::from(path);
        }
        if let Some(delimiter) = &section.delimiter {
            output.delimiter = delimiter_parser(delimiter).map_err(|e| anyhow!(e))?;
        }
        Ok(())
    }
}
