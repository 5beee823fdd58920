use linmod_core::{Matrix, MlError, MlResult};

/// QR decomposition result: A = Q * R
pub struct QrDecomposition {
    /// m×n with orthonormal columns (zero columns where A is rank deficient).
    pub q: Matrix,
    /// n×n upper triangular.
    pub r: Matrix,
}

fn require_square(a: &Matrix, op: &str) -> MlResult<()> {
    if !a.is_square() {
        return Err(MlError::DimensionMismatch(format!(
            "{} requires a square matrix, got {}x{}",
            op,
            a.rows(),
            a.cols()
        )));
    }
    Ok(())
}

/// The submatrix of `a` with row `row` and column `col` removed.
pub fn minor(a: &Matrix, row: usize, col: usize) -> Matrix {
    let (n, m) = a.shape();
    let mut out = Matrix::zeros(n.saturating_sub(1), m.saturating_sub(1));
    for (oi, i) in (0..n).filter(|&i| i != row).enumerate() {
        for (oj, j) in (0..m).filter(|&j| j != col).enumerate() {
            out[(oi, oj)] = a[(i, j)];
        }
    }
    out
}

/// Determinant by recursive cofactor expansion along the first row.
///
/// The 0×0 determinant is 1 (empty product).
pub fn det(a: &Matrix) -> MlResult<f64> {
    require_square(a, "determinant")?;
    Ok(det_unchecked(a))
}

fn det_unchecked(a: &Matrix) -> f64 {
    match a.rows() {
        0 => 1.0,
        1 => a[(0, 0)],
        2 => a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)],
        n => {
            let mut total = 0.0;
            for j in 0..n {
                let entry = a[(0, j)];
                if entry == 0.0 {
                    continue;
                }
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                total += sign * entry * det_unchecked(&minor(a, 0, j));
            }
            total
        }
    }
}

/// Signed minor `(-1)^(i+j) · det(minor(a, i, j))`.
pub fn cofactor(a: &Matrix, row: usize, col: usize) -> MlResult<f64> {
    require_square(a, "cofactor")?;
    let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
    Ok(sign * det_unchecked(&minor(a, row, col)))
}

/// Transpose of the cofactor matrix.
pub fn adjugate(a: &Matrix) -> MlResult<Matrix> {
    require_square(a, "adjugate")?;
    let n = a.rows();
    let mut adj = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            adj[(j, i)] = cofactor(a, i, j)?;
        }
    }
    Ok(adj)
}

/// Inverse as `adjugate(a) / det(a)`.
///
/// Singular input is not special-cased: a zero determinant yields inf/NaN
/// entries and callers must check [`Matrix::is_finite`].
pub fn inverse(a: &Matrix) -> MlResult<Matrix> {
    let d = det(a)?;
    Ok(adjugate(a)?.scale(1.0 / d))
}

/// QR decomposition via modified Gram-Schmidt.
///
/// Columns that are (numerically) dependent on earlier ones get a zero
/// column in Q and a zero diagonal entry in R, so `Q·R ≈ A` still holds.
pub fn qrd(a: &Matrix) -> MlResult<QrDecomposition> {
    let (m, n) = a.shape();
    let mut q = Matrix::zeros(m, n);
    let mut r = Matrix::zeros(n, n);

    // Work column by column on a copy of A
    let mut cols: Vec<Vec<f64>> = (0..n).map(|j| a.col(j)).collect();

    for j in 0..n {
        let norm = cols[j].iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm < 1e-12 {
            continue;
        }
        r[(j, j)] = norm;
        for i in 0..m {
            q[(i, j)] = cols[j][i] / norm;
        }
        for k in (j + 1)..n {
            let proj: f64 = (0..m).map(|i| q[(i, j)] * cols[k][i]).sum();
            r[(j, k)] = proj;
            for i in 0..m {
                cols[k][i] -= proj * q[(i, j)];
            }
        }
    }

    Ok(QrDecomposition { q, r })
}
