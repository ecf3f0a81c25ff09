use anyhow::{Context, Result};
use clap::Parser;
use imu_static::args::Cli;
use imu_static::config::{ImuStaticConfig, OutputSettings};
use imu_static::{io, DetectError, DetectorParams, StaticDetector};
use std::process;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("Error: {:#}", e);
        let code = e.downcast_ref::<DetectError>().map_or(1, DetectError::exit_code);
        process::exit(code);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.clone().or_else(ImuStaticConfig::default_path) {
        Some(path) => {
            log::info!("Using config file {}", path.display());
            ImuStaticConfig::load(&path)?
        }
        None => ImuStaticConfig::default(),
    };

    let mut params = DetectorParams::default();
    config.apply_detector(&mut params)?;
    cli.apply_detector(&mut params);

    let mut output = OutputSettings::default();
    config.apply_output(&mut output)?;
    cli.apply_output(&mut output);

    println!(
        "Detector parameters: window {:.2} s, min static {:.2} s, min dynamic {:.2} s",
        params.time_window, params.min_static, params.min_dynamic
    );

    let table = io::load_samples(&cli.in_file, output.delimiter)
        .with_context(|| format!("Failed to load samples from {}", cli.in_file.display()))?;

    let detector = StaticDetector::new(params)?;
    let started = Instant::now();
    let detection = detector.detect(&table)?;
    log::info!("Intervals detected in {:.2} s", started.elapsed().as_secs_f64());

    if detection.static_count() == 0 {
        println!("Static intervals are not detected.");
        return Ok(());
    }

    println!("Detection results:");
    print!("{}", io::format_intervals(&detection.intervals));

    io::save_intervals(&output.intervals, &detection.intervals, output.delimiter)
        .with_context(|| format!("Failed to save intervals to {}", output.intervals.display()))?;
    println!("Detected intervals were saved in: {}", output.intervals.display());

    io::save_annotated(&output.samples, &detection.annotated, output.delimiter)
        .with_context(|| format!("Failed to save samples to {}", output.samples.display()))?;
    println!("Output data were saved in: {}", output.samples.display());

    Ok(())
}
