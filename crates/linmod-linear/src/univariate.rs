use std::path::Path;

use linmod_core::vector::mean;
use linmod_core::{MlError, MlResult, Parameters};
use linmod_io::{save_parameters, IoError};

/// Below this `Σ(x - x̄)²` the input is treated as constant.
const VARIANCE_FLOOR: f64 = 1e-20;

/// Closed-form simple linear regression `ŷ = b0 + b1·x`.
///
/// Fitted once at construction. A constant input (including a single sample)
/// has no defined slope; the fit then degrades to `b1 = 0`, `b0 = mean(y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct UniLinReg {
    x: Vec<f64>,
    y: Vec<f64>,
    b0: f64,
    b1: f64,
}

impl UniLinReg {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> MlResult<Self> {
        if x.is_empty() {
            return Err(MlError::EmptyInput("univariate regression needs at least one sample".into()));
        }
        if x.len() != y.len() {
            return Err(MlError::DimensionMismatch(format!(
                "{} inputs but {} targets",
                x.len(),
                y.len()
            )));
        }

        let x_mean = mean(&x);
        let y_mean = mean(&y);
        let (mut cov, mut var) = (0.0, 0.0);
        for (xi, yi) in x.iter().zip(&y) {
            let dx = xi - x_mean;
            cov += dx * (yi - y_mean);
            var += dx * dx;
        }

        let (b0, b1) = if var < VARIANCE_FLOOR {
            (y_mean, 0.0)
        } else {
            let b1 = cov / var;
            (y_mean - b1 * x_mean, b1)
        };
        Ok(UniLinReg { x, y, b0, b1 })
    }

    /// Intercept.
    pub fn b0(&self) -> f64 {
        self.b0
    }

    /// Slope.
    pub fn b1(&self) -> f64 {
        self.b1
    }

    pub fn model_test(&self, x: f64) -> f64 {
        self.b0 + self.b1 * x
    }

    pub fn model_set_test(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&v| self.model_test(v)).collect()
    }

    /// The fit as a one-feature linear predictor.
    pub fn parameters(&self) -> Parameters {
        Parameters::new(vec![self.b1], self.b0)
    }

    /// R² on the training set.
    pub fn score(&self) -> MlResult<f64> {
        linmod_metrics::r2_score(&self.y, &self.model_set_test(&self.x))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IoError> {
        save_parameters(path, &self.parameters())
    }
}
