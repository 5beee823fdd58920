use serde::{Deserialize, Serialize};

use crate::error::{MlError, MlResult};
use crate::matrix::Matrix;
use crate::vector::dot;

/// Learned parameters of a linear predictor `z = X·w + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl Parameters {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Parameters { weights, bias }
    }

    /// All-zero parameters for `k` features.
    pub fn zeros(k: usize) -> Self {
        Parameters {
            weights: vec![0.0; k],
            bias: 0.0,
        }
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Linear predictor for one sample: `w·x + b`.
    pub fn linear(&self, x: &[f64]) -> MlResult<f64> {
        Ok(dot(&self.weights, x)? + self.bias)
    }

    /// Linear predictor for every row of `x`.
    pub fn linear_set(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        if x.cols() != self.weights.len() {
            return Err(MlError::ShapeMismatch {
                expected: vec![x.rows(), self.weights.len()],
                got: vec![x.rows(), x.cols()],
            });
        }
        let mut z = x.mat_vec(&self.weights)?;
        for v in z.iter_mut() {
            *v += self.bias;
        }
        Ok(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_predictor() {
        let p = Parameters::new(vec![2.0, -1.0], 0.5);
        assert_eq!(p.linear(&[1.0, 1.0]).unwrap(), 1.5);

        let x = Matrix::from_rows(&[vec![1.0, 1.0], vec![0.0, 2.0]]).unwrap();
        assert_eq!(p.linear_set(&x).unwrap(), vec![1.5, -1.5]);
    }

    #[test]
    fn test_linear_set_checks_width() {
        let p = Parameters::zeros(3);
        let x = Matrix::zeros(4, 2);
        assert!(matches!(
            p.linear_set(&x),
            Err(MlError::ShapeMismatch { .. })
        ));
    }
}
