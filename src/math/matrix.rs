use rand::Rng;
use std::ops::{Add, Mul, Sub};

use crate::math::random::sample_standard_normal;

/// Dense row-major matrix. Rows are samples, columns are features/units.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from row vectors. Every row must have the same width.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, |row| row.len());
        assert!(
            data.iter().all(|row| row.len() == cols),
            "Matrix rows have inconsistent widths"
        );
        Matrix {
            rows: data.len(),
            cols,
            data,
        }
    }

    /// Column vector (n × 1).
    pub fn column(values: &[f64]) -> Matrix {
        Matrix::from_data(values.iter().map(|&v| vec![v]).collect())
    }

    /// He initialization: samples from N(0, sqrt(2 / rows)).
    ///
    /// Recommended before (Leaky)ReLU layers. The variance 2/fan_in accounts
    /// for the rectifier discarding roughly half of its inputs.
    ///
    /// Shape: (rows, cols). `rows` is the fan-in, since weights map
    /// `inputs × outputs`.
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::scaled_normal(rows, cols, (2.0 / rows as f64).sqrt(), rng)
    }

    /// Xavier initialization: samples from N(0, sqrt(1 / rows)).
    ///
    /// Shape: (rows, cols). `rows` is the fan-in.
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::scaled_normal(rows, cols, (1.0 / rows as f64).sqrt(), rng)
    }

    fn scaled_normal<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for x in row.iter_mut() {
                *x = sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.shape(), rhs.shape(), "Hadamard operands differ in shape");
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect())
            .collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Mean over the row (batch) axis, kept as a single row (1 × cols).
    pub fn column_mean(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        if self.rows == 0 {
            return res;
        }
        for row in &self.data {
            for (acc, x) in res.data[0].iter_mut().zip(row) {
                *acc += x;
            }
        }
        let inv = 1.0 / self.rows as f64;
        for acc in res.data[0].iter_mut() {
            *acc *= inv;
        }
        res
    }

    /// Adds a (1 × cols) row to every row of `self`.
    pub fn add_row(&self, row: &Matrix) -> Matrix {
        assert!(
            row.rows == 1 && row.cols == self.cols,
            "Row broadcast needs a 1 x {} operand, got {} x {}",
            self.cols,
            row.rows,
            row.cols
        );
        let bias = &row.data[0];
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|r| r.iter().zip(bias).map(|(x, b)| x + b).collect())
                .collect(),
        }
    }

    /// Gathers rows by index, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
        }
    }

    /// Contiguous row range `[start, end)`.
    pub fn slice_rows(&self, start: usize, end: usize) -> Matrix {
        Matrix {
            rows: end - start,
            cols: self.cols,
            data: self.data[start..end].to_vec(),
        }
    }

    /// Horizontal concatenation; all parts must share the row count.
    pub fn hstack(parts: &[Matrix]) -> Matrix {
        let rows = parts.first().map_or(0, |m| m.rows);
        assert!(
            parts.iter().all(|m| m.rows == rows),
            "hstack operands have different row counts"
        );
        let cols = parts.iter().map(|m| m.cols).sum();
        let data = (0..rows)
            .map(|i| {
                let mut row = Vec::with_capacity(cols);
                for part in parts {
                    row.extend_from_slice(&part.data[i]);
                }
                row
            })
            .collect();
        Matrix { rows, cols, data }
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, j: usize) -> Vec<f64> {
        self.data.iter().map(|row| row[j]).collect()
    }

    /// All values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        self.data.iter().flat_map(|row| row.iter().copied())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }

        res
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        // i-k-j order walks both operands row-wise.
        for i in 0..self.rows {
            let out = &mut res.data[i];
            for (k, &a) in self.data[i].iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                for (o, &b) in out.iter_mut().zip(rhs.data[k].iter()) {
                    *o += a * b;
                }
            }
        }

        res
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}
