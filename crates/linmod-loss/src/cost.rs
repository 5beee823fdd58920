use linmod_core::vector::sign;
use linmod_core::{Matrix, MlError, MlResult};

/// Offset inside the logarithms of [`CostFunction::LogLoss`].
pub const LOG_LOSS_EPS: f64 = 1e-8;

/// Cost functions over predictions `ŷ` and targets `y`.
///
/// `n` is the number of samples: the vector length, or the row count of a
/// matrix. Derivatives are taken with respect to each prediction and have the
/// shape of `ŷ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostFunction {
    /// `Σ(ŷ - y)² / 2n`
    Mse,
    /// `sqrt(Σ(ŷ - y)² / n)`
    Rmse,
    /// `Σ|ŷ - y| / n`
    Mae,
    /// `Σ(ŷ - y) / n`
    Mbe,
    /// Binary cross-entropy, averaged.
    LogLoss,
    /// `-Σ y ln ŷ`, summed.
    CrossEntropy,
    /// `Σ max(0, 1 - yŷ) / n` with labels in {-1, +1}.
    Hinge,
    /// Quadratic inside `delta`, linear outside; summed.
    Huber { delta: f64 },
    /// `-Σ ŷy / n`
    Wasserstein,
}

fn check_same_len(y_hat: &[f64], y: &[f64]) -> MlResult<()> {
    if y_hat.len() != y.len() {
        return Err(MlError::DimensionMismatch(format!(
            "cost: {} predictions for {} targets",
            y_hat.len(),
            y.len()
        )));
    }
    Ok(())
}

fn check_same_shape(y_hat: &Matrix, y: &Matrix) -> MlResult<()> {
    if y_hat.shape() != y.shape() {
        return Err(MlError::ShapeMismatch {
            expected: vec![y.rows(), y.cols()],
            got: vec![y_hat.rows(), y_hat.cols()],
        });
    }
    Ok(())
}

impl CostFunction {
    pub fn value(&self, y_hat: &[f64], y: &[f64]) -> MlResult<f64> {
        check_same_len(y_hat, y)?;
        Ok(self.value_flat(y_hat, y, y.len()))
    }

    pub fn deriv(&self, y_hat: &[f64], y: &[f64]) -> MlResult<Vec<f64>> {
        check_same_len(y_hat, y)?;
        Ok(self.deriv_flat(y_hat, y, y.len()))
    }

    pub fn value_matrix(&self, y_hat: &Matrix, y: &Matrix) -> MlResult<f64> {
        check_same_shape(y_hat, y)?;
        Ok(self.value_flat(y_hat.data(), y.data(), y.rows()))
    }

    pub fn deriv_matrix(&self, y_hat: &Matrix, y: &Matrix) -> MlResult<Matrix> {
        check_same_shape(y_hat, y)?;
        let grad = self.deriv_flat(y_hat.data(), y.data(), y.rows());
        Matrix::new(grad, y_hat.rows(), y_hat.cols())
    }

    fn value_flat(&self, y_hat: &[f64], y: &[f64], n: usize) -> f64 {
        let n = n as f64;
        let pairs = y_hat.iter().zip(y);
        match *self {
            CostFunction::Mse => pairs.map(|(p, t)| (p - t).powi(2)).sum::<f64>() / (2.0 * n),
            CostFunction::Rmse => (pairs.map(|(p, t)| (p - t).powi(2)).sum::<f64>() / n).sqrt(),
            CostFunction::Mae => pairs.map(|(p, t)| (p - t).abs()).sum::<f64>() / n,
            CostFunction::Mbe => pairs.map(|(p, t)| p - t).sum::<f64>() / n,
            CostFunction::LogLoss => {
                -pairs
                    .map(|(p, t)| {
                        t * (p + LOG_LOSS_EPS).ln() + (1.0 - t) * (1.0 - p + LOG_LOSS_EPS).ln()
                    })
                    .sum::<f64>()
                    / n
            }
            CostFunction::CrossEntropy => -pairs.map(|(p, t)| t * p.ln()).sum::<f64>(),
            CostFunction::Hinge => pairs.map(|(p, t)| (1.0 - t * p).max(0.0)).sum::<f64>() / n,
            CostFunction::Huber { delta } => pairs
                .map(|(p, t)| {
                    let e = (p - t).abs();
                    if e <= delta {
                        e * e
                    } else {
                        2.0 * delta * e - delta * delta
                    }
                })
                .sum(),
            CostFunction::Wasserstein => -pairs.map(|(p, t)| p * t).sum::<f64>() / n,
        }
    }

    fn deriv_flat(&self, y_hat: &[f64], y: &[f64], n: usize) -> Vec<f64> {
        let n = n as f64;
        let pairs = y_hat.iter().zip(y);
        match *self {
            CostFunction::Mse => pairs.map(|(p, t)| (p - t) / n).collect(),
            CostFunction::Rmse => {
                let rmse = self.value_flat(y_hat, y, n as usize);
                pairs.map(|(p, t)| (p - t) / (n * rmse)).collect()
            }
            CostFunction::Mae => pairs.map(|(p, t)| sign(p - t) / n).collect(),
            CostFunction::Mbe => pairs.map(|_| 1.0 / n).collect(),
            CostFunction::LogLoss => pairs
                .map(|(p, t)| -(t / (p + LOG_LOSS_EPS) - (1.0 - t) / (1.0 - p + LOG_LOSS_EPS)) / n)
                .collect(),
            CostFunction::CrossEntropy => pairs.map(|(p, t)| -t / p).collect(),
            CostFunction::Hinge => pairs
                .map(|(p, t)| if 1.0 - t * p > 0.0 { -t / n } else { 0.0 })
                .collect(),
            CostFunction::Huber { delta } => pairs
                .map(|(p, t)| {
                    let e = p - t;
                    if e.abs() <= delta {
                        2.0 * e
                    } else {
                        2.0 * delta * sign(e)
                    }
                })
                .collect(),
            CostFunction::Wasserstein => pairs.map(|(_, t)| -t / n).collect(),
        }
    }
}
