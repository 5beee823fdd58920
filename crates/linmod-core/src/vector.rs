//! Element-wise and reduction helpers on `&[f64]` vectors.
//!
//! Binary operations require equal lengths and return
//! [`MlError::DimensionMismatch`] otherwise; nothing is truncated or padded.

use crate::error::{MlError, MlResult};
use crate::matrix::Matrix;

fn check_len(op: &str, a: &[f64], b: &[f64]) -> MlResult<()> {
    if a.len() != b.len() {
        return Err(MlError::DimensionMismatch(format!(
            "{}: lengths {} and {} differ",
            op,
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

pub fn add(a: &[f64], b: &[f64]) -> MlResult<Vec<f64>> {
    check_len("addition", a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

pub fn subtract(a: &[f64], b: &[f64]) -> MlResult<Vec<f64>> {
    check_len("subtraction", a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

/// Element-wise product.
pub fn hadamard(a: &[f64], b: &[f64]) -> MlResult<Vec<f64>> {
    check_len("hadamard product", a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).collect())
}

/// Element-wise quotient. Division by zero yields inf/NaN.
pub fn elementwise_division(a: &[f64], b: &[f64]) -> MlResult<Vec<f64>> {
    check_len("element-wise division", a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x / y).collect())
}

pub fn scalar_multiply(scalar: f64, v: &[f64]) -> Vec<f64> {
    v.iter().map(|x| scalar * x).collect()
}

pub fn scalar_add(scalar: f64, v: &[f64]) -> Vec<f64> {
    v.iter().map(|x| scalar + x).collect()
}

/// Sum of element-wise products.
pub fn dot(a: &[f64], b: &[f64]) -> MlResult<f64> {
    check_len("dot product", a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

pub fn sum_elements(v: &[f64]) -> f64 {
    v.iter().sum()
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(v: &[f64]) -> f64 {
    sum_elements(v) / v.len() as f64
}

/// Squared Euclidean norm.
pub fn norm_sq(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

pub fn norm(v: &[f64]) -> f64 {
    norm_sq(v).sqrt()
}

/// Outer product `a bᵀ` as an `a.len() × b.len()` matrix.
pub fn outer_product(a: &[f64], b: &[f64]) -> Matrix {
    let mut out = Matrix::zeros(a.len(), b.len());
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[(i, j)] = x * y;
        }
    }
    out
}

/// Cross product of two 3-vectors.
pub fn cross(a: &[f64], b: &[f64]) -> MlResult<Vec<f64>> {
    if a.len() != 3 || b.len() != 3 {
        return Err(MlError::DimensionMismatch(format!(
            "cross product needs two 3-vectors, got lengths {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(vec![
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ])
}

/// Sign with `sign(0) == 0`.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
