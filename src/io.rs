use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use crate::detector::AnnotatedSample;
use crate::interval::Interval;
use crate::sample::{Sample, SampleTable, SAMPLE_COLUMNS};

#[derive(Serialize)]
struct IntervalRow {
    start: i64,
    stop: i64,
    #[serde(rename = "type")]
    kind: i32,
    quality: f64,
    reserved: f64,
}

#[derive(Serialize)]
struct AnnotatedRow {
    ustime: i64,
    gx: f64,
    gy: f64,
    gz: f64,
    ax: f64,
    ay: f64,
    az: f64,
    #[serde(rename = "static")]
    label: i32,
}

/// Reads `ustime gx gy gz ax ay az` rows. The first line is a header and is
/// skipped; runs of the delimiter count as one.
pub fn load_samples<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<SampleTable> {
    let path = path.as_ref();
    info!("Loading samples from {}", path.display());

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut table = SampleTable::new();
    for rec in rdr.records() {
        let rec = rec.with_context(|| format!("Failed to read {}", path.display()))?;
        let line = rec.position().map(|p| p.line()).unwrap_or_default();

        let fields: Vec<&str> = rec.iter().map(str::trim).filter(|f| !f.is_empty()).collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != SAMPLE_COLUMNS {
            bail!(
                "{}:{}: expected {} columns, found {}",
                path.display(),
                line,
                SAMPLE_COLUMNS,
                fields.len()
            );
        }

        let timestamp_us: i64 = fields[0]
            .parse()
            .with_context(|| format!("{}:{}: invalid timestamp '{}'", path.display(), line, fields[0]))?;
        let mut values = [0.0; SAMPLE_COLUMNS - 1];
        for (value, field) in values.iter_mut().zip(&fields[1..]) {
            *value = field
                .parse()
                .with_context(|| format!("{}:{}: invalid value '{}'", path.display(), line, field))?;
        }

        table.push(Sample::new(
            timestamp_us,
            [values[0], values[1], values[2]],
            [values[3], values[4], values[5]],
        ));
    }

    info!("Loaded {} samples", table.len());
    Ok(table)
}

pub fn save_intervals<P: AsRef<Path>>(path: P, intervals: &[Interval], delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} intervals to {}", intervals.len(), path.display());

    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for iv in intervals {
        wtr.serialize(IntervalRow {
            start: iv.start,
            stop: iv.end,
            kind: iv.kind.code(),
            quality: iv.quality,
            reserved: iv.reserved,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_annotated<P: AsRef<Path>>(path: P, rows: &[AnnotatedSample], delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} annotated samples to {}", rows.len(), path.display());

    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        let s = &row.sample;
        wtr.serialize(AnnotatedRow {
            ustime: s.timestamp_us,
            gx: s.gyro[0],
            gy: s.gyro[1],
            gz: s.gyro[2],
            ax: s.accel[0],
            ay: s.accel[1],
            az: s.accel[2],
            label: row.label.code(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Fixed-width table of intervals for the terminal.
pub fn format_intervals(intervals: &[Interval]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>8} {:>8} {:>8} {:>8} {:>8}", "Start", "Stop", "Type", "Quality", "Reserved");
    for iv in intervals {
        let _ = writeln!(
            out,
            "{:>8} {:>8} {:>8} {:>8.4} {:>8.4}",
            iv.start,
            iv.end,
            iv.kind.code(),
            iv.quality,
            iv.reserved
        );
    }
    let _ = writeln!(out, "{} intervals", intervals.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::IntervalKind;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("imu-static-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_space_separated() {
        let path = temp_path("load.csv");
        std::fs::write(
            &path,
            "ustime gx gy gz ax ay az\n\
             1000 1 2 3 100 200 16384\n\
             2000  -1 -2 -3  101 199 16380 \n\
             \n\
             3000 0 0 0 0.5 0.25 1e3\n",
        )
        .unwrap();

        let table = load_samples(&path, b' ').unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.timestamps(), &[1000, 2000, 3000]);
        let s = table.sample(1).unwrap();
        assert_eq!(s.gyro, [-1.0, -2.0, -3.0]);
        assert_eq!(s.accel, [101.0, 199.0, 16380.0]);
        assert_eq!(table.sample(2).unwrap().accel, [0.5, 0.25, 1000.0]);
    }

    #[test]
    fn test_load_rejects_short_rows() {
        let path = temp_path("short.csv");
        std::fs::write(&path, "ustime gx gy gz ax ay az\n1000 1 2 3 4 5\n").unwrap();
        let err = load_samples(&path, b' ').unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("expected 7 columns"), "{}", err);
    }

    #[test]
    fn test_load_rejects_bad_numbers() {
        let path = temp_path("bad.csv");
        std::fs::write(&path, "h\n1000,1,2,3,4,5,x\n").unwrap();
        let err = load_samples(&path, b',').unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(format!("{:#}", err).contains("invalid value 'x'"), "{:#}", err);
    }

    #[test]
    fn test_save_intervals() {
        let path = temp_path("intervals.csv");
        let mut st = Interval::new(102, 397, IntervalKind::Static);
        st.quality = 0.5;
        let intervals = [st, Interval::new(398, 420, IntervalKind::ShortDynamic)];
        save_intervals(&path, &intervals, b' ').unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["start stop type quality reserved", "102 397 1 0.5 0.0", "398 420 -2 0.0 0.0"]);
    }

    #[test]
    fn test_save_annotated() {
        let path = temp_path("out.csv");
        let rows = [AnnotatedSample {
            sample: Sample::new(5000, [1.0, 2.0, 3.0], [4.0, 5.0, 6.5]),
            label: IntervalKind::Dynamic,
        }];
        save_annotated(&path, &rows, b' ').unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["ustime gx gy gz ax ay az static", "5000 1.0 2.0 3.0 4.0 5.0 6.5 -1"]);
    }

    #[test]
    fn test_format_intervals() {
        let table = format_intervals(&[Interval::new(0, 9, IntervalKind::Dynamic)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Quality"));
        assert!(lines[1].trim_start().starts_with("0        9       -1"));
        assert_eq!(lines[2], "1 intervals");
    }
}
