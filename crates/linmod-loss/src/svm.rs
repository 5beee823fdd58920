use linmod_core::{Matrix, MlError, MlResult};

fn check_dual_inputs(alpha: &[f64], x: &Matrix, y: &[f64]) -> MlResult<()> {
    if alpha.len() != x.rows() || y.len() != x.rows() {
        return Err(MlError::DimensionMismatch(format!(
            "dual SVM: {} multipliers and {} labels for {} samples",
            alpha.len(),
            y.len(),
            x.rows()
        )));
    }
    Ok(())
}

/// Linear-kernel SVM dual objective
/// `-Σα + ½ ΣΣ αᵢαⱼ yᵢyⱼ (xᵢ·xⱼ)`, to be minimised.
pub fn dual_form_svm(alpha: &[f64], x: &Matrix, y: &[f64]) -> MlResult<f64> {
    check_dual_inputs(alpha, x, y)?;
    let kernel = x.matmul(&x.transpose())?;
    let n = x.rows();
    let mut quad = 0.0;
    for i in 0..n {
        for j in 0..n {
            quad += alpha[i] * alpha[j] * y[i] * y[j] * kernel[(i, j)];
        }
    }
    Ok(-alpha.iter().sum::<f64>() + 0.5 * quad)
}

/// Gradient of [`dual_form_svm`] with respect to the multipliers:
/// `-1 + yᵢ Σⱼ αⱼyⱼ (xᵢ·xⱼ)`.
pub fn dual_form_svm_deriv(alpha: &[f64], x: &Matrix, y: &[f64]) -> MlResult<Vec<f64>> {
    check_dual_inputs(alpha, x, y)?;
    let kernel = x.matmul(&x.transpose())?;
    let n = x.rows();
    Ok((0..n)
        .map(|i| {
            let s: f64 = (0..n).map(|j| alpha[j] * y[j] * kernel[(i, j)]).sum();
            -1.0 + y[i] * s
        })
        .collect())
}
