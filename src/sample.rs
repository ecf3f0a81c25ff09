use crate::error::DetectError;
use crate::matrix::Matrix;

pub const COL_TIME: usize = 0;
pub const COL_GX: usize = 1;
pub const COL_GY: usize = 2;
pub const COL_GZ: usize = 3;
pub const COL_AX: usize = 4;
pub const COL_AY: usize = 5;
pub const COL_AZ: usize = 6;

/// Number of columns in a raw sample row.
pub const SAMPLE_COLUMNS: usize = 7;

/// One gyroscope + accelerometer reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp_us: i64,
    pub gyro: [f64; 3],
    pub accel: [f64; 3],
}

impl Sample {
    pub fn new(timestamp_us: i64, gyro: [f64; 3], accel: [f64; 3]) -> Self {
        Self {
            timestamp_us,
            gyro,
            accel,
        }
    }

    fn to_row(self) -> [f64; SAMPLE_COLUMNS] {
        let mut row = [0.0; SAMPLE_COLUMNS];
        row[COL_TIME] = self.timestamp_us as f64;
        row[COL_GX..=COL_GZ].copy_from_slice(&self.gyro);
        row[COL_AX..=COL_AZ].copy_from_slice(&self.accel);
        row
    }
}

/// Time-ordered table of samples.
///
/// Rows are only ever appended. Timestamps are kept alongside the numeric
/// buffer as integers so elapsed-time arithmetic stays exact.
#[derive(Debug, Clone)]
pub struct SampleTable {
    timestamps: Vec<i64>,
    data: Matrix,
}

impl Default for SampleTable {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl SampleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(rows: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(rows),
            data: Matrix::with_capacity(rows, SAMPLE_COLUMNS),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        let pushed = self.data.push_row(&sample.to_row());
        debug_assert!(pushed.is_ok(), "sample rows are always {} wide", SAMPLE_COLUMNS);
        self.timestamps.push(sample.timestamp_us);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn sample(&self, index: usize) -> Result<Sample, DetectError> {
        let row = self.matrix().row(index)?;
        Ok(Sample {
            timestamp_us: self.timestamps[index],
            gyro: [row[COL_GX], row[COL_GY], row[COL_GZ]],
            accel: [row[COL_AX], row[COL_AY], row[COL_AZ]],
        })
    }

    /// Underlying numeric buffer, `SAMPLE_COLUMNS` wide.
    pub fn matrix(&self) -> &Matrix {
        &self.data
    }
}

impl FromIterator<Sample> for SampleTable {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut table = SampleTable::new();
        for sample in iter {
            table.push(sample);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_roundtrips_rows() {
        let table: SampleTable = (0..3)
            .map(|i| Sample::new(i * 1000, [1.0, 2.0, 3.0], [4.0, 5.0, i as f64]))
            .collect();
        assert_eq!(table.len(), 3);
        assert_eq!(table.timestamps()[2], 2000);
        assert_eq!(table.matrix().row(1).unwrap()[COL_AZ], 1.0);
        assert_eq!(table.matrix().row(2).unwrap()[COL_TIME], 2000.0);
        let s = table.sample(2).unwrap();
        assert_eq!(s.accel, [4.0, 5.0, 2.0]);
        assert!(table.sample(3).is_err());
    }

    #[test]
    fn test_table_rows_follow_timestamps() {
        let mut table = SampleTable::with_capacity(4);
        for i in 0..250 {
            table.push(Sample::new(i * 10, [0.0; 3], [i as f64; 3]));
            assert_eq!(table.matrix().rows(), table.len());
        }
        assert_eq!(table.sample(249).unwrap().timestamp_us, 2490);
        assert_eq!(table.sample(249).unwrap().accel, [249.0; 3]);
    }

    #[test]
    fn test_empty_table() {
        let table = SampleTable::new();
        assert!(table.is_empty());
        assert!(table.matrix().is_empty());
        assert!(table.timestamps().is_empty());
    }
}
