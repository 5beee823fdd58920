use linmod_activation::Activation;
use linmod_core::{Matrix, MlResult};
use linmod_loss::CostFunction;
use linmod_optim::{Optimizer, TrainingHistory};

use crate::config::ModelConfig;
use crate::glm::{Glm, GlmEstimator};

/// Binary logistic regression: `P(y = 1 | x) = σ(w·x + b)`.
///
/// Targets are 0/1. Cost is log loss; because the sigmoid is the canonical
/// link of the Bernoulli likelihood the gradient signal is simply `ŷ - y`.
#[derive(Debug, Clone)]
pub struct LogReg {
    glm: Glm,
    optimizer: Optimizer,
}

impl LogReg {
    pub fn new(x: Matrix, y: Vec<f64>, config: ModelConfig) -> MlResult<Self> {
        let (glm, optimizer) =
            Glm::with_optimizer(x, y, Activation::Sigmoid, CostFunction::LogLoss, &config)?;
        Ok(LogReg {
            glm: glm.canonical(),
            optimizer,
        })
    }

    pub fn mle(&mut self, learning_rate: f64, max_epoch: usize) -> MlResult<TrainingHistory> {
        self.optimizer.mle(&mut self.glm, learning_rate, max_epoch)
    }
}

impl GlmEstimator for LogReg {
    fn glm(&self) -> &Glm {
        &self.glm
    }

    fn parts_mut(&mut self) -> (&mut Glm, &mut Optimizer) {
        (&mut self.glm, &mut self.optimizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn and_gate() -> (Matrix, Vec<f64>) {
        let x = Matrix::from_rows(&[
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ])
        .unwrap();
        (x, vec![0.0, 0.0, 0.0, 1.0])
    }

    #[test]
    fn test_learns_and_gate() {
        let (x, y) = and_gate();
        let mut model = LogReg::new(x.clone(), y, ModelConfig::default().with_seed(11)).unwrap();
        let history = model.gradient_descent(0.5, 5000).unwrap();

        assert!(history.last_cost().unwrap() < history.first_cost().unwrap());
        assert_eq!(model.score().unwrap(), 1.0);
        let probs = model.model_set_test(&x).unwrap();
        assert!(probs[3] > 0.5);
        assert!(probs[..3].iter().all(|&p| p < 0.5));
    }

    #[test]
    fn test_mle_matches_gradient_descent() {
        let (x, y) = and_gate();
        let config = ModelConfig::default().with_seed(4);
        let mut a = LogReg::new(x.clone(), y.clone(), config).unwrap();
        let mut b = LogReg::new(x, y, config).unwrap();
        a.gradient_descent(0.1, 20).unwrap();
        b.mle(0.1, 20).unwrap();
        for (wa, wb) in a.weights().iter().zip(b.weights()) {
            assert_abs_diff_eq!(*wa, *wb, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(a.bias(), b.bias(), epsilon = 1e-9);
    }

    #[test]
    fn test_outputs_are_probabilities() {
        let (x, y) = and_gate();
        let model = LogReg::new(x, y, ModelConfig::default().with_seed(0)).unwrap();
        let p = model.model_test(&[10.0, -3.0]).unwrap();
        assert!(p > 0.0 && p < 1.0);
    }
}
