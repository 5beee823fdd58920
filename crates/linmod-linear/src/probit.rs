use linmod_activation::Activation;
use linmod_core::{Matrix, MlResult};
use linmod_loss::CostFunction;
use linmod_optim::{Optimizer, TrainingHistory};

use crate::config::ModelConfig;
use crate::glm::{Glm, GlmEstimator};

/// Probit regression: `P(y = 1 | x) = Φ(w·x + b)` with the standard normal CDF.
///
/// The descent loops minimize the squared error through `Φ`, which is the
/// cost this model reports; [`mle`](ProbitReg::mle) maximizes the Bernoulli
/// likelihood instead and records log loss.
#[derive(Debug, Clone)]
pub struct ProbitReg {
    glm: Glm,
    optimizer: Optimizer,
}

impl ProbitReg {
    pub fn new(x: Matrix, y: Vec<f64>, config: ModelConfig) -> MlResult<Self> {
        let (glm, optimizer) =
            Glm::with_optimizer(x, y, Activation::GaussianCdf, CostFunction::Mse, &config)?;
        Ok(ProbitReg { glm, optimizer })
    }

    /// Maximum-likelihood ascent on the Bernoulli log-likelihood.
    pub fn mle(&mut self, learning_rate: f64, max_epoch: usize) -> MlResult<TrainingHistory> {
        self.optimizer.mle(&mut self.glm, learning_rate, max_epoch)
    }
}

impl GlmEstimator for ProbitReg {
    fn glm(&self) -> &Glm {
        &self.glm
    }

    fn parts_mut(&mut self) -> (&mut Glm, &mut Optimizer) {
        (&mut self.glm, &mut self.optimizer)
    }
}
