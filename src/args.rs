use crate::config::OutputSettings;
use crate::params::{DetectorParams, QuietPolicy};
use crate::util::{delimiter_parser, seconds_parser};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Splits IMU recordings into static and dynamic intervals for calibration.")]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Delimited text file with columns: ustime gx gy gz ax ay az
    #[arg(index = 1)]
    pub in_file: PathBuf,
    /// Variance window in seconds
    #[arg(index = 2, value_parser = seconds_parser, requires_all = ["min_static", "min_dynamic"])]
    pub time_window: Option<f64>,
    /// Minimal static interval length in seconds
    #[arg(index = 3, value_parser = seconds_parser)]
    pub min_static: Option<f64>,
    /// Minimal dynamic interval length in seconds
    #[arg(index = 4, value_parser = seconds_parser)]
    pub min_dynamic: Option<f64>,

    /// KDL configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output file for the interval table
    #[arg(long)]
    pub intervals: Option<PathBuf>,
    /// Output file for the labelled samples
    #[arg(long)]
    pub samples: Option<PathBuf>,
    /// Column delimiter for input and output files
    #[arg(long, value_parser = delimiter_parser)]
    pub delimiter: Option<u8>,
    /// Behaviour when no motion at all is found: reject or static
    #[arg(long)]
    pub quiet_policy: Option<QuietPolicy>,
    /// Fail if more raw intervals than this are found
    #[arg(long)]
    pub max_intervals: Option<usize>,
    /// Offset subtracted from accelerometer readings before variance
    #[arg(long)]
    pub bias_shift: Option<f64>,
}

impl Cli {
    pub fn apply_detector(&self, params: &mut DetectorParams) {
        if let Some(v) = self.time_window {
            params.time_window = v;
        }
        if let Some(v) = self.min_static {
            params.min_static = v;
        }
        if let Some(v) = self.min_dynamic {
            params.min_dynamic = v;
        }
        if let Some(v) = self.quiet_policy {
            params.quiet_policy = v;
        }
        if let Some(v) = self.max_intervals {
            params.max_intervals = Some(v);
        }
        if let Some(v) = self.bias_shift {
            params.bias_shift = v;
        }
    }

    pub fn apply_output(&self, output: &mut OutputSettings) {
        if let Some(path) = &self.intervals {
            output.intervals = path.clone();
        }
        if let Some(path) = &self.samples {
            output.samples = path.clone();
        }
        if let Some(d) = self.delimiter {
            output.delimiter = d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_only() {
        let cli = Cli::try_parse_from(["imu-static", "data.csv"]).unwrap();
        let mut params = DetectorParams::default();
        cli.apply_detector(&mut params);
        assert_eq!(params, DetectorParams::default());
        assert_eq!(cli.in_file, PathBuf::from("data.csv"));
    }

    #[test]
    fn test_positional_seconds() {
        let cli = Cli::try_parse_from(["imu-static", "data.csv", "0.25", "2", "0.5"]).unwrap();
        let mut params = DetectorParams::default();
        cli.apply_detector(&mut params);
        assert_eq!(params.time_window, 0.25);
        assert_eq!(params.min_static, 2.0);
        assert_eq!(params.min_dynamic, 0.5);
    }

    #[test]
    fn test_partial_positionals_are_rejected() {
        assert!(Cli::try_parse_from(["imu-static", "data.csv", "0.25"]).is_err());
        assert!(Cli::try_parse_from(["imu-static", "data.csv", "-0.25", "1", "1"]).is_err());
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "imu-static",
            "data.csv",
            "--quiet-policy",
            "static",
            "--max-intervals",
            "64",
            "--delimiter",
            "tab",
            "--intervals",
            "iv.tsv",
            "--bias-shift",
            "-5",
        ])
        .unwrap();

        let mut params = DetectorParams::default();
        cli.apply_detector(&mut params);
        assert_eq!(params.quiet_policy, QuietPolicy::Static);
        assert_eq!(params.max_intervals, Some(64));
        assert_eq!(params.bias_shift, -5.0);

        let mut output = OutputSettings::default();
        cli.apply_output(&mut output);
        assert_eq!(output.delimiter, b'\t');
        assert_eq!(output.intervals, PathBuf::from("iv.tsv"));
        assert_eq!(output.samples, PathBuf::from("out.csv"));
    }
}
