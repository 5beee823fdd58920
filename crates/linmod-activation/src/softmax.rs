use linmod_core::Matrix;

/// `exp(z_i) / Σ exp(z_j)`, evaluated directly.
///
/// Large inputs overflow to NaN; use [`adj_softmax`] for those.
pub fn softmax(z: &[f64]) -> Vec<f64> {
    let exps: Vec<f64> = z.iter().map(|v| v.exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Softmax with `max(z)` subtracted before exponentiating.
pub fn adj_softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let shifted: Vec<f64> = z.iter().map(|v| v - max).collect();
    softmax(&shifted)
}

/// Jacobian `∂softmax_i/∂z_j = p_i(δ_ij - p_j)`.
pub fn softmax_deriv(z: &[f64]) -> Matrix {
    let p = adj_softmax(z);
    let n = p.len();
    let mut jac = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let delta = if i == j { 1.0 } else { 0.0 };
            jac[(i, j)] = p[i] * (delta - p[j]);
        }
    }
    jac
}

/// Row-wise [`softmax`].
pub fn softmax_matrix(z: &Matrix) -> Matrix {
    map_rows(z, softmax)
}

/// Row-wise [`adj_softmax`].
pub fn adj_softmax_matrix(z: &Matrix) -> Matrix {
    map_rows(z, adj_softmax)
}

fn map_rows(z: &Matrix, f: fn(&[f64]) -> Vec<f64>) -> Matrix {
    let mut out = z.clone();
    for i in 0..z.rows() {
        let row = f(z.row(i));
        out.row_mut(i).copy_from_slice(&row);
    }
    out
}
