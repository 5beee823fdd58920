use linmod_activation::Activation;
use linmod_core::{Matrix, MlResult};
use linmod_loss::CostFunction;
use linmod_optim::{Optimizer, TrainingHistory};

use crate::config::ModelConfig;
use crate::glm::{Glm, GlmEstimator};

/// Complementary log-log regression: `P(y = 1 | x) = 1 - exp(-exp(w·x + b))`.
///
/// Asymmetric around 0.5, which suits outcomes where one class is rare. Like
/// [`ProbitReg`](crate::ProbitReg), descent minimizes the squared error through
/// the link and [`mle`](CLogLogReg::mle) records log loss.
#[derive(Debug, Clone)]
pub struct CLogLogReg {
    glm: Glm,
    optimizer: Optimizer,
}

impl CLogLogReg {
    pub fn new(x: Matrix, y: Vec<f64>, config: ModelConfig) -> MlResult<Self> {
        let (glm, optimizer) =
            Glm::with_optimizer(x, y, Activation::CLogLog, CostFunction::Mse, &config)?;
        Ok(CLogLogReg { glm, optimizer })
    }

    pub fn mle(&mut self, learning_rate: f64, max_epoch: usize) -> MlResult<TrainingHistory> {
        self.optimizer.mle(&mut self.glm, learning_rate, max_epoch)
    }
}

impl GlmEstimator for CLogLogReg {
    fn glm(&self) -> &Glm {
        &self.glm
    }

    fn parts_mut(&mut self) -> (&mut Glm, &mut Optimizer) {
        (&mut self.glm, &mut self.optimizer)
    }
}
