use crate::error::DetectError;

/// Row-major rectangular buffer of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Empty buffer with room reserved for `rows` rows.
    pub fn with_capacity(rows: usize, cols: usize) -> Self {
        Self {
            rows: 0,
            cols,
            data: Vec::with_capacity(rows * cols),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Appends a row. The row must have exactly `cols` values.
    pub fn push_row(&mut self, row: &[f64]) -> Result<(), DetectError> {
        if row.len() != self.cols {
            return Err(DetectError::InvalidColumn {
                column: row.len(),
                cols: self.cols,
            });
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<&[f64], DetectError> {
        if row >= self.rows {
            return Err(DetectError::InvalidIndexRange {
                from: row,
                to: row,
                rows: self.rows,
            });
        }
        let start = row * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Iterates one column over the inclusive row range `from..=to`.
    pub fn column_range(
        &self,
        col: usize,
        from: usize,
        to: usize,
    ) -> Result<impl Iterator<Item = f64> + '_, DetectError> {
        self.check_column(col)?;
        if from > to || to >= self.rows {
            return Err(DetectError::InvalidIndexRange {
                from,
                to,
                rows: self.rows,
            });
        }
        Ok((from..=to).map(move |r| self.data[r * self.cols + col]))
    }

    /// Population variance of `col` over rows `from..=to`, after subtracting
    /// `shift` from every value.
    ///
    /// The mean is accumulated incrementally so that a run of identical
    /// values has a variance of exactly zero.
    pub fn variance(&self, col: usize, from: usize, to: usize, shift: f64) -> Result<f64, DetectError> {
        let count = (to.saturating_sub(from) + 1) as f64;

        let mut mean = 0.0;
        for (k, v) in self.column_range(col, from, to)?.enumerate() {
            mean += (v - shift - mean) / (k + 1) as f64;
        }
        let var = self
            .column_range(col, from, to)?
            .map(|v| {
                let d = v - shift - mean;
                d * d
            })
            .sum::<f64>()
            / count;

        Ok(var)
    }

    fn check_column(&self, col: usize) -> Result<(), DetectError> {
        if col >= self.cols {
            return Err(DetectError::InvalidColumn {
                column: col,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[f64]) -> Matrix {
        let mut m = Matrix::with_capacity(values.len(), 1);
        for &v in values {
            m.push_row(&[v]).unwrap();
        }
        m
    }

    #[test]
    fn test_population_variance() {
        let m = column(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((m.variance(0, 0, 7, 0.0).unwrap() - 4.0).abs() < 1e-12);
        assert_eq!(m.variance(0, 0, 0, 0.0).unwrap(), 0.0);
        assert_eq!(m.variance(0, 1, 3, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_variance_ignores_consistent_shift() {
        let m = column(&[32677.0, 32675.0, 32677.0, 32675.0]);
        let shifted = m.variance(0, 0, 3, 32676.0).unwrap();
        let plain = m.variance(0, 0, 3, 0.0).unwrap();
        assert!((shifted - 1.0).abs() < 1e-12);
        assert!((plain - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_are_checked() {
        let m = column(&[1.0, 2.0, 3.0]);
        assert_eq!(
            m.variance(1, 0, 2, 0.0),
            Err(DetectError::InvalidColumn { column: 1, cols: 1 })
        );
        assert_eq!(
            m.variance(0, 2, 1, 0.0),
            Err(DetectError::InvalidIndexRange { from: 2, to: 1, rows: 3 })
        );
        assert!(m.variance(0, 0, 3, 0.0).is_err());
        assert!(m.row(5).is_err());
    }

    #[test]
    fn test_push_rows() {
        let mut m = Matrix::with_capacity(2, 3);
        m.push_row(&[0.0, 0.0, 7.5]).unwrap();
        assert!(m.push_row(&[1.0, 2.0]).is_err());
        m.push_row(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.row(0).unwrap(), &[0.0, 0.0, 7.5]);
        assert_eq!(m.row(1).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(m.values(), &[0.0, 0.0, 7.5, 1.0, 2.0, 3.0]);
    }
}
