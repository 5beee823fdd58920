use linmod_activation::Activation;
use linmod_core::{Matrix, MlResult};
use linmod_loss::CostFunction;
use linmod_optim::Optimizer;

use crate::config::ModelConfig;
use crate::glm::{Glm, GlmEstimator};

/// Regression through a `tanh` link, for targets in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct TanhReg {
    glm: Glm,
    optimizer: Optimizer,
}

impl TanhReg {
    pub fn new(x: Matrix, y: Vec<f64>, config: ModelConfig) -> MlResult<Self> {
        let (glm, optimizer) = Glm::with_optimizer(x, y, Activation::Tanh, CostFunction::Mse, &config)?;
        Ok(TanhReg { glm, optimizer })
    }
}

impl GlmEstimator for TanhReg {
    fn glm(&self) -> &Glm {
        &self.glm
    }

    fn parts_mut(&mut self) -> (&mut Glm, &mut Optimizer) {
        (&mut self.glm, &mut self.optimizer)
    }
}
