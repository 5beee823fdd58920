use std::path::Path;

use linmod_activation::Activation;
use linmod_core::{Matrix, MlError, MlResult, Parameters};
use linmod_data::{bias_initialization, weight_initialization};
use linmod_io::{save_parameters, IoError};
use linmod_loss::CostFunction;
use linmod_metrics::performance;
use linmod_optim::{Optimizer, Trainable, TrainingHistory, Verbosity};
use linmod_regularization::RegularizationConfig;

use crate::config::ModelConfig;

/// Generalized linear model `ŷ = f(Xw + b)` over an owned training set.
///
/// The estimators in this crate are thin wrappers choosing the link `f` and
/// the reported loss. `z` and `ŷ` for the training set are cached and
/// refreshed after every parameter change.
#[derive(Debug, Clone)]
pub struct Glm {
    x: Matrix,
    y: Vec<f64>,
    params: Parameters,
    link: Activation,
    loss: CostFunction,
    reg: RegularizationConfig,
    canonical: bool,
    z: Vec<f64>,
    y_hat: Vec<f64>,
}

impl Glm {
    /// Validate the training set, draw initial parameters and run the first
    /// forward pass.
    pub fn new<R: rand::Rng + ?Sized>(
        x: Matrix,
        y: Vec<f64>,
        link: Activation,
        loss: CostFunction,
        config: &ModelConfig,
        rng: &mut R,
    ) -> MlResult<Self> {
        if x.rows() == 0 {
            return Err(MlError::EmptyInput("training set has no samples".into()));
        }
        if x.rows() != y.len() {
            return Err(MlError::DimensionMismatch(format!(
                "{} samples but {} targets",
                x.rows(),
                y.len()
            )));
        }
        config.validate()?;

        let weights = weight_initialization(x.cols(), config.weight_init, rng)?;
        let bias = bias_initialization(rng);
        let mut glm = Glm {
            x,
            y,
            params: Parameters::new(weights, bias),
            link,
            loss,
            reg: config.regularization,
            canonical: false,
            z: Vec::new(),
            y_hat: Vec::new(),
        };
        glm.forward_pass()?;
        Ok(glm)
    }

    /// Build the model together with an optimizer that inherits the
    /// configured RNG stream and verbosity.
    pub fn with_optimizer(
        x: Matrix,
        y: Vec<f64>,
        link: Activation,
        loss: CostFunction,
        config: &ModelConfig,
    ) -> MlResult<(Glm, Optimizer)> {
        let mut rng = config.rng();
        let glm = Glm::new(x, y, link, loss, config, &mut rng)?;
        Ok((glm, Optimizer::new(rng, config.verbosity)))
    }

    /// Use the plain error `ŷ - y` as the gradient signal. Correct when the
    /// link is canonical for the loss, e.g. sigmoid with log loss.
    pub fn canonical(mut self) -> Self {
        self.canonical = true;
        self
    }

    pub fn n_samples(&self) -> usize {
        self.x.rows()
    }

    pub fn n_features(&self) -> usize {
        self.x.cols()
    }

    /// `f(w·x + b)` for one sample.
    pub fn model_test(&self, x: &[f64]) -> MlResult<f64> {
        Ok(self.link.apply(self.params.linear(x)?))
    }

    /// `f(Xw + b)` for every row of `x`.
    pub fn model_set_test(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        self.evaluate(x)
    }

    /// Replace the parameters; the weight count must match the feature count.
    pub fn set_parameters(&mut self, params: Parameters) -> MlResult<()> {
        if params.n_features() != self.n_features() {
            return Err(MlError::ShapeMismatch {
                expected: vec![self.n_features()],
                got: vec![params.n_features()],
            });
        }
        self.params = params;
        self.forward_pass()
    }

    /// Loss plus penalty at the current parameters.
    pub fn current_cost(&self) -> MlResult<f64> {
        self.cost(&self.y_hat, &self.y)
    }
}

impl Trainable for Glm {
    fn input_set(&self) -> &Matrix {
        &self.x
    }

    fn output_set(&self) -> &[f64] {
        &self.y
    }

    fn parameters(&self) -> &Parameters {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    fn link(&self) -> Activation {
        self.link
    }

    fn loss(&self) -> CostFunction {
        self.loss
    }

    fn regularization(&self) -> &RegularizationConfig {
        &self.reg
    }

    fn z(&self) -> &[f64] {
        &self.z
    }

    fn y_hat(&self) -> &[f64] {
        &self.y_hat
    }

    fn forward_pass(&mut self) -> MlResult<()> {
        self.z = self.params.linear_set(&self.x)?;
        self.y_hat = self.link.apply_vec(&self.z);
        Ok(())
    }

    fn delta(&self, y_hat: &[f64], y: &[f64], z: &[f64]) -> MlResult<Vec<f64>> {
        if !self.canonical {
            return linmod_optim::gradient_signal(self.link, y_hat, y, z);
        }
        if y_hat.len() != y.len() {
            return Err(MlError::DimensionMismatch(format!(
                "{} predictions but {} targets",
                y_hat.len(),
                y.len()
            )));
        }
        Ok(y_hat.iter().zip(y).map(|(p, t)| p - t).collect())
    }
}

/// Operations shared by every estimator built on a [`Glm`].
///
/// Implementors only expose their model and optimizer; training, prediction,
/// scoring and persistence come from the default methods.
pub trait GlmEstimator {
    fn glm(&self) -> &Glm;
    fn parts_mut(&mut self) -> (&mut Glm, &mut Optimizer);

    fn model_test(&self, x: &[f64]) -> MlResult<f64> {
        self.glm().model_test(x)
    }

    fn model_set_test(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        self.glm().model_set_test(x)
    }

    fn parameters(&self) -> &Parameters {
        self.glm().parameters()
    }

    fn weights(&self) -> &[f64] {
        &self.glm().parameters().weights
    }

    fn bias(&self) -> f64 {
        self.glm().parameters().bias
    }

    /// Loss plus penalty on the training set.
    fn cost(&self) -> MlResult<f64> {
        self.glm().current_cost()
    }

    /// Share of training predictions that round to their target.
    fn score(&self) -> MlResult<f64> {
        let glm = self.glm();
        performance(glm.output_set(), glm.y_hat())
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.parts_mut().1.set_verbosity(verbosity);
    }

    fn gradient_descent(&mut self, learning_rate: f64, max_epoch: usize) -> MlResult<TrainingHistory> {
        let (glm, optimizer) = self.parts_mut();
        optimizer.gradient_descent(glm, learning_rate, max_epoch)
    }

    fn sgd(&mut self, learning_rate: f64, max_epoch: usize) -> MlResult<TrainingHistory> {
        let (glm, optimizer) = self.parts_mut();
        optimizer.sgd(glm, learning_rate, max_epoch)
    }

    fn mini_batch(
        &mut self,
        learning_rate: f64,
        max_epoch: usize,
        batch_size: usize,
    ) -> MlResult<TrainingHistory> {
        let (glm, optimizer) = self.parts_mut();
        optimizer.mini_batch(glm, learning_rate, max_epoch, batch_size)
    }

    /// Write the weights, then the bias, one value per line.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IoError> {
        save_parameters(path, self.parameters())
    }
}
