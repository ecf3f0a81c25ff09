use log::debug;

use crate::error::DetectError;
use crate::matrix::Matrix;
use crate::params::DetectorParams;
use crate::sample::{SampleTable, COL_AX, COL_AY, COL_AZ};

const COL_LOG: usize = 0;

/// Sample-count quantities derived from the time-based parameters.
///
/// All lengths are signed so boundary arithmetic can go below zero before
/// clamping. Fractional counts are always rounded down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLayout {
    /// Rows spanned by the requested time window.
    pub w_len: i64,
    /// `ceil(w_len / 2)`.
    pub half_window: i64,
    /// Lag compensation applied to interval borders: `w_len + floor(w_len / 2)`.
    pub shift: i64,
    pub min_static_len: i64,
    pub min_dynamic_len: i64,
    /// Rows in the sample table.
    pub sample_count: i64,
}

impl WindowLayout {
    pub fn from_table(table: &SampleTable, params: &DetectorParams) -> Result<Self, DetectError> {
        let timestamps = table.timestamps();
        let t0 = *timestamps
            .first()
            .ok_or_else(|| DetectError::InsufficientData("sample table is empty".to_string()))?;

        let end = timestamps
            .iter()
            .skip(1)
            .position(|&t| (t - t0) as f64 / 1.0e6 >= params.time_window)
            .ok_or_else(|| {
                DetectError::InsufficientData(format!(
                    "recording of {} samples never spans the {} s window",
                    timestamps.len(),
                    params.time_window
                ))
            })?;

        // `position` counts from index 1.
        let w_len = end as i64 + 2;
        let half_window = (w_len + 1) / 2;
        let sample_count = timestamps.len() as i64;

        if 2 * half_window >= sample_count {
            return Err(DetectError::InsufficientData(format!(
                "{} samples cannot hold a window of {} samples on each side",
                sample_count, half_window
            )));
        }

        let rows_per_second = w_len as f64 / params.time_window;

        Ok(Self {
            w_len,
            half_window,
            shift: w_len + w_len / 2,
            min_static_len: (rows_per_second * params.min_static).floor() as i64,
            min_dynamic_len: (rows_per_second * params.min_dynamic).floor() as i64,
            sample_count,
        })
    }
}

/// Log-compressed windowed accelerometer-variance magnitude, one row per
/// eligible sample.
///
/// Row `k` describes sample `k + half_window`.
#[derive(Debug, Clone)]
pub struct MagnitudeSequence {
    data: Matrix,
    half_window: i64,
}

impl MagnitudeSequence {
    pub fn estimate(
        table: &SampleTable,
        window: &WindowLayout,
        bias_shift: f64,
    ) -> Result<Self, DetectError> {
        let n = table.len();
        let h = window.half_window as usize;
        let samples = table.matrix();

        let mut data = Matrix::with_capacity(n.saturating_sub(2 * h), 1);
        for i in h..n.saturating_sub(h) {
            let vax = samples.variance(COL_AX, i - h, i + h, bias_shift)?;
            let vay = samples.variance(COL_AY, i - h, i + h, bias_shift)?;
            let vaz = samples.variance(COL_AZ, i - h, i + h, bias_shift)?;

            let magnitude = (vax * vax + vay * vay + vaz * vaz).sqrt();
            data.push_row(&[(magnitude + 1.0).log10()])?;
        }

        debug!("Estimated {} magnitude values (half window {})", data.rows(), h);

        Ok(Self {
            data,
            half_window: window.half_window,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_log_values(values: &[f64], half_window: i64) -> Self {
        let mut data = Matrix::with_capacity(values.len(), 1);
        for &v in values {
            data.push_row(&[v]).unwrap();
        }
        Self { data, half_window }
    }

    pub fn len(&self) -> usize {
        self.data.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Log magnitudes in row order.
    pub fn log_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.values().iter().copied()
    }

    /// Magnitude row describing sample `index`; may fall outside the rows.
    pub fn row_index(&self, index: i64) -> i64 {
        index - self.half_window
    }

    /// Population variance of the log magnitude over rows `from..=to`.
    pub fn log_variance(&self, from: usize, to: usize) -> Result<f64, DetectError> {
        self.data.variance(COL_LOG, from, to, 0.0)
    }
}
