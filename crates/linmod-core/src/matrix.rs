use crate::error::{MlError, MlResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Dense row-major matrix of `f64`.
///
/// Stored as a flat `Vec<f64>` with `rows * cols` entries. Every row has the
/// same length, so ragged matrices cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl Matrix {
    /// Create a matrix from flat row-major data.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> MlResult<Self> {
        if data.len() != rows * cols {
            return Err(MlError::ShapeMismatch {
                expected: vec![rows, cols],
                got: vec![data.len()],
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Create a matrix from a sequence of equal-length rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> MlResult<Self> {
        if rows.is_empty() {
            return Ok(Matrix::zeros(0, 0));
        }
        let cols = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MlError::DimensionMismatch(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
        }
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Ok(Matrix {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// A single-column matrix holding `values`.
    pub fn column(values: &[f64]) -> Self {
        Matrix {
            data: values.to_vec(),
            rows: values.len(),
            cols: 1,
        }
    }

    /// A single-row matrix holding `values`.
    pub fn row_vector(values: &[f64]) -> Self {
        Matrix {
            data: values.to_vec(),
            rows: 1,
            cols: values.len(),
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix::full(rows, cols, 0.0)
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Matrix::full(rows, cols, 1.0)
    }

    pub fn full(rows: usize, cols: usize, value: f64) -> Self {
        Matrix {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Identity matrix of size n×n.
    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Diagonal matrix with `diag` on the main diagonal.
    pub fn diag(diag: &[f64]) -> Self {
        let n = diag.len();
        let mut m = Matrix::zeros(n, n);
        for (i, &d) in diag.iter().enumerate() {
            m.data[i * n + i] = d;
        }
        m
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Borrow row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Copy column `j` out.
    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self.data[i * self.cols + j]).collect()
    }

    /// Nested-`Vec` view of the matrix.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(|r| r.to_vec()).collect()
    }

    /// Rows `start..end` as a new matrix.
    pub fn slice_rows(&self, start: usize, end: usize) -> Matrix {
        Matrix {
            data: self.data[start * self.cols..end * self.cols].to_vec(),
            rows: end - start,
            cols: self.cols,
        }
    }

    /// Gather the given rows, in order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Matrix {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }

    /// All finite?
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    // ─── Shape Manipulation ─────────────────────────────────────────────────

    pub fn transpose(&self) -> Matrix {
        let mut data = vec![0.0; self.data.len()];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Flatten to a row-major vector.
    pub fn flatten(&self) -> Vec<f64> {
        self.data.clone()
    }

    // ─── Element-wise Operations ────────────────────────────────────────────

    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Matrix {
        Matrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Matrix, op: &str, f: F) -> MlResult<Matrix> {
        if self.shape() != other.shape() {
            return Err(MlError::DimensionMismatch(format!(
                "{}: {}x{} vs {}x{}",
                op, self.rows, self.cols, other.rows, other.cols
            )));
        }
        Ok(Matrix {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            rows: self.rows,
            cols: self.cols,
        })
    }

    pub fn add(&self, other: &Matrix) -> MlResult<Matrix> {
        self.zip_with(other, "addition", |a, b| a + b)
    }

    pub fn sub(&self, other: &Matrix) -> MlResult<Matrix> {
        self.zip_with(other, "subtraction", |a, b| a - b)
    }

    /// Element-wise product.
    pub fn hadamard(&self, other: &Matrix) -> MlResult<Matrix> {
        self.zip_with(other, "hadamard product", |a, b| a * b)
    }

    /// Multiply every entry by `scalar`.
    pub fn scale(&self, scalar: f64) -> Matrix {
        self.map(|x| x * scalar)
    }

    /// Add `scalar` to every entry.
    pub fn shift(&self, scalar: f64) -> Matrix {
        self.map(|x| x + scalar)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    // ─── Products ───────────────────────────────────────────────────────────

    /// Standard matrix product; requires `self.cols == other.rows`.
    pub fn matmul(&self, other: &Matrix) -> MlResult<Matrix> {
        if self.cols != other.rows {
            return Err(MlError::DimensionMismatch(format!(
                "matmul: inner dimensions must match, got {} and {}",
                self.cols, other.rows
            )));
        }
        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut data = vec![0.0; m * n];
        for i in 0..m {
            for p in 0..k {
                let a = self.data[i * k + p];
                for j in 0..n {
                    data[i * n + j] += a * other.data[p * n + j];
                }
            }
        }
        Ok(Matrix { data, rows: m, cols: n })
    }

    /// Matrix-vector product `self · v`.
    pub fn mat_vec(&self, v: &[f64]) -> MlResult<Vec<f64>> {
        if self.cols != v.len() {
            return Err(MlError::DimensionMismatch(format!(
                "mat_vec: matrix has {} columns, vector has {} entries",
                self.cols,
                v.len()
            )));
        }
        Ok(self
            .iter_rows()
            .map(|row| row.iter().zip(v).map(|(&a, &b)| a * b).sum())
            .collect())
    }

    /// `selfᵀ · v` without materialising the transpose.
    pub fn t_mat_vec(&self, v: &[f64]) -> MlResult<Vec<f64>> {
        if self.rows != v.len() {
            return Err(MlError::DimensionMismatch(format!(
                "t_mat_vec: matrix has {} rows, vector has {} entries",
                self.rows,
                v.len()
            )));
        }
        let mut out = vec![0.0; self.cols];
        for (row, &s) in self.iter_rows().zip(v) {
            for (o, &x) in out.iter_mut().zip(row) {
                *o += x * s;
            }
        }
        Ok(out)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = MlError;

    fn try_from(rows: Vec<Vec<f64>>) -> MlResult<Self> {
        Matrix::from_rows(&rows)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix({}x{})", self.rows, self.cols)?;
        for row in self.iter_rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
            writeln!(f, "  [{}]", cells.join(", "))?;
        }
        Ok(())
    }
}
