use linmod_activation::Activation;
use linmod_core::{Matrix, MlError, MlResult, Parameters};
use linmod_data::create_mini_batches_with_output;
use linmod_linalg::{solve, weighted_gram_matrix};
use linmod_loss::CostFunction;
use linmod_regularization::{reg_term, reg_weights, RegularizationConfig};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::logger::{TrainingLogger, Verbosity};

/// Floor for `ŷ(1 - ŷ)` in the likelihood score.
const VARIANCE_FLOOR: f64 = 1e-12;

/// What the optimizer needs from a model: its data, its parameters, and the
/// link/loss/penalty triple that defines the objective.
///
/// Implementors cache `z = Xw + b` and `ŷ = f(z)` for the full training set;
/// [`forward_pass`](Trainable::forward_pass) refreshes that cache.
pub trait Trainable {
    fn input_set(&self) -> &Matrix;
    fn output_set(&self) -> &[f64];
    fn parameters(&self) -> &Parameters;
    fn parameters_mut(&mut self) -> &mut Parameters;
    fn link(&self) -> Activation;
    fn loss(&self) -> CostFunction;
    fn regularization(&self) -> &RegularizationConfig;

    /// Cached linear predictor of the training set.
    fn z(&self) -> &[f64];
    /// Cached predictions for the training set.
    fn y_hat(&self) -> &[f64];
    fn forward_pass(&mut self) -> MlResult<()>;

    /// `Xw + b`
    fn propagate(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        self.parameters().linear_set(x)
    }

    /// `f(Xw + b)`
    fn evaluate(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        Ok(self.link().apply_vec(&self.propagate(x)?))
    }

    /// Loss plus the regularization penalty on the current weights.
    fn cost(&self, y_hat: &[f64], y: &[f64]) -> MlResult<f64> {
        Ok(self.loss().value(y_hat, y)? + reg_term(&self.parameters().weights, self.regularization()))
    }

    /// Per-sample error signal `δ`; the weight gradient is `Xᵀδ / n`.
    fn delta(&self, y_hat: &[f64], y: &[f64], z: &[f64]) -> MlResult<Vec<f64>> {
        gradient_signal(self.link(), y_hat, y, z)
    }
}

/// `(ŷ - y) ⊙ f'(z)`
pub fn gradient_signal(link: Activation, y_hat: &[f64], y: &[f64], z: &[f64]) -> MlResult<Vec<f64>> {
    if y_hat.len() != y.len() || z.len() != y.len() {
        return Err(MlError::DimensionMismatch(format!(
            "gradient: {} predictions, {} targets, {} activations",
            y_hat.len(),
            y.len(),
            z.len()
        )));
    }
    Ok(y_hat
        .iter()
        .zip(y)
        .zip(z)
        .map(|((p, t), &zi)| (p - t) * link.derivative(zi))
        .collect())
}

/// Costs recorded during a training run.
///
/// Each entry is the cost evaluated just before one update, on the data that
/// update used: the full set for batch methods, the drawn sample for SGD and
/// the current batch for mini-batch descent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub costs: Vec<f64>,
}

impl TrainingHistory {
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn first_cost(&self) -> Option<f64> {
        self.costs.first().copied()
    }

    pub fn last_cost(&self) -> Option<f64> {
        self.costs.last().copied()
    }
}

/// Gradient-based training loops over any [`Trainable`] model.
///
/// Owns the random source used for SGD draws so runs are reproducible when
/// it was seeded.
#[derive(Debug, Clone)]
pub struct Optimizer {
    rng: StdRng,
    logger: TrainingLogger,
}

impl Optimizer {
    pub fn new(rng: StdRng, verbosity: Verbosity) -> Self {
        Optimizer {
            rng,
            logger: TrainingLogger::new(verbosity),
        }
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.logger.set_verbosity(verbosity);
    }

    pub fn verbosity(&self) -> Verbosity {
        self.logger.verbosity()
    }

    /// Full-batch gradient descent for exactly `max_epoch` epochs.
    pub fn gradient_descent<M: Trainable>(
        &mut self,
        model: &mut M,
        learning_rate: f64,
        max_epoch: usize,
    ) -> MlResult<TrainingHistory> {
        self.logger.start_training("gradient descent", max_epoch);
        let mut history = TrainingHistory::default();
        model.forward_pass()?;

        for epoch in 1..=max_epoch {
            let cost_prev = model.cost(model.y_hat(), model.output_set())?;
            history.costs.push(cost_prev);

            let delta = model.delta(model.y_hat(), model.output_set(), model.z())?;
            let grad = model.input_set().t_mat_vec(&delta)?;
            apply_step(model, &grad, delta.iter().sum(), delta.len(), learning_rate);

            model.forward_pass()?;
            self.report(model, epoch, cost_prev, || model.cost(model.y_hat(), model.output_set()))?;
        }

        self.logger.finish_training(history.last_cost());
        Ok(history)
    }

    /// Stochastic gradient descent: each of the `max_epoch` iterations draws
    /// one sample uniformly at random, with replacement.
    pub fn sgd<M: Trainable>(
        &mut self,
        model: &mut M,
        learning_rate: f64,
        max_epoch: usize,
    ) -> MlResult<TrainingHistory> {
        self.logger.start_training("SGD", max_epoch);
        let mut history = TrainingHistory::default();
        let n = model.output_set().len();
        if n == 0 {
            return Err(MlError::EmptyInput("SGD needs at least one sample".into()));
        }

        for epoch in 1..=max_epoch {
            let i = self.rng.gen_range(0..n);
            let x_i = model.input_set().select_rows(&[i]);
            let y_i = [model.output_set()[i]];

            let z_i = model.propagate(&x_i)?;
            let y_hat_i = model.link().apply_vec(&z_i);
            let cost_prev = model.cost(&y_hat_i, &y_i)?;
            history.costs.push(cost_prev);

            let delta = model.delta(&y_hat_i, &y_i, &z_i)?;
            let grad = x_i.t_mat_vec(&delta)?;
            apply_step(model, &grad, delta[0], 1, learning_rate);

            self.report(model, epoch, cost_prev, || model.cost(&model.evaluate(&x_i)?, &y_i))?;
        }

        model.forward_pass()?;
        self.logger.finish_training(history.last_cost());
        Ok(history)
    }

    /// Mini-batch gradient descent over `⌊n / batch_size⌋` contiguous
    /// batches, visiting every batch once per epoch.
    ///
    /// A `batch_size` larger than the training set gives a single batch. Each
    /// step is scaled by `lr / batch length`, not by `lr / n`.
    pub fn mini_batch<M: Trainable>(
        &mut self,
        model: &mut M,
        learning_rate: f64,
        max_epoch: usize,
        batch_size: usize,
    ) -> MlResult<TrainingHistory> {
        if batch_size == 0 {
            return Err(MlError::InvalidParameter("batch_size must be positive".into()));
        }
        let n = model.output_set().len();
        let n_batches = (n / batch_size).max(1);
        let batches = create_mini_batches_with_output(model.input_set(), model.output_set(), n_batches)?;

        self.logger.start_training("mini-batch gradient descent", max_epoch);
        let mut history = TrainingHistory::default();

        for epoch in 1..=max_epoch {
            for (x_b, y_b) in &batches {
                let z_b = model.propagate(x_b)?;
                let y_hat_b = model.link().apply_vec(&z_b);
                let cost_prev = model.cost(&y_hat_b, y_b)?;
                history.costs.push(cost_prev);

                let delta = model.delta(&y_hat_b, y_b, &z_b)?;
                let grad = x_b.t_mat_vec(&delta)?;
                apply_step(model, &grad, delta.iter().sum(), delta.len(), learning_rate);

                self.report(model, epoch, cost_prev, || model.cost(&model.evaluate(x_b)?, y_b))?;
            }
        }

        model.forward_pass()?;
        self.logger.finish_training(history.last_cost());
        Ok(history)
    }

    /// Damped Gauss-Newton iterations on the squared error.
    ///
    /// Uses the gradient `g = Xᵀ((ŷ - y) ⊙ f'(z))` and the Hessian
    /// approximation `H = Xᵀ diag(f'(z)²) X`, both over `X` augmented with a
    /// column of ones for the bias, and steps `(w, b) ← (w, b) - lr·H⁻¹g`.
    /// For the identity link one step with `lr = 1` is the least-squares
    /// solution. A singular `H` propagates non-finite weights.
    pub fn newton_raphson<M: Trainable>(
        &mut self,
        model: &mut M,
        learning_rate: f64,
        max_epoch: usize,
    ) -> MlResult<TrainingHistory> {
        self.logger.start_training("Newton-Raphson", max_epoch);
        let mut history = TrainingHistory::default();
        let augmented = with_bias_column(model.input_set());
        model.forward_pass()?;

        for epoch in 1..=max_epoch {
            let cost_prev = model.cost(model.y_hat(), model.output_set())?;
            history.costs.push(cost_prev);

            let link = model.link();
            let slope = link.derivative_vec(model.z());
            let delta = gradient_signal(link, model.y_hat(), model.output_set(), model.z())?;
            let curvature: Vec<f64> = slope.iter().map(|s| s * s).collect();

            let hessian = weighted_gram_matrix(&augmented, &curvature)?;
            let grad = augmented.t_mat_vec(&delta)?;
            let step = solve(&hessian, &grad)?;

            let reg = *model.regularization();
            let params = model.parameters_mut();
            let k = params.weights.len();
            for (w, s) in params.weights.iter_mut().zip(&step[..k]) {
                *w -= learning_rate * s;
            }
            params.weights = reg_weights(&params.weights, &reg);
            params.bias -= learning_rate * step[k];

            model.forward_pass()?;
            self.report(model, epoch, cost_prev, || model.cost(model.y_hat(), model.output_set()))?;
        }

        self.logger.finish_training(history.last_cost());
        Ok(history)
    }

    /// Maximum-likelihood training of a Bernoulli model `P(y = 1) = f(z)`.
    ///
    /// Ascends the log-likelihood along its score
    /// `Xᵀ((y - ŷ) ⊙ f'(z) / (ŷ(1 - ŷ))) / n`; for the logistic link this is
    /// the plain error `y - ŷ`. The recorded cost is the negative
    /// log-likelihood per sample plus the penalty, whatever `model.loss()` is.
    pub fn mle<M: Trainable>(
        &mut self,
        model: &mut M,
        learning_rate: f64,
        max_epoch: usize,
    ) -> MlResult<TrainingHistory> {
        self.logger.start_training("maximum likelihood", max_epoch);
        let mut history = TrainingHistory::default();
        model.forward_pass()?;

        for epoch in 1..=max_epoch {
            let cost_prev = likelihood_cost(model, model.y_hat(), model.output_set())?;
            history.costs.push(cost_prev);

            let delta = likelihood_signal(model.link(), model.y_hat(), model.output_set(), model.z())?;
            let grad = model.input_set().t_mat_vec(&delta)?;
            apply_step(model, &grad, delta.iter().sum(), delta.len(), learning_rate);

            model.forward_pass()?;
            self.report(model, epoch, cost_prev, || {
                likelihood_cost(model, model.y_hat(), model.output_set())
            })?;
        }

        self.logger.finish_training(history.last_cost());
        Ok(history)
    }

    fn report<M, F>(&self, model: &M, epoch: usize, cost_prev: f64, cost_after: F) -> MlResult<()>
    where
        M: Trainable,
        F: FnOnce() -> MlResult<f64>,
    {
        if self.logger.enabled(Verbosity::Info) {
            self.logger.log_epoch(epoch, cost_prev, cost_after()?);
            self.logger.log_parameters(model.parameters());
        }
        Ok(())
    }
}

/// Bernoulli negative log-likelihood plus the penalty.
fn likelihood_cost<M: Trainable>(model: &M, y_hat: &[f64], y: &[f64]) -> MlResult<f64> {
    Ok(CostFunction::LogLoss.value(y_hat, y)? + reg_term(&model.parameters().weights, model.regularization()))
}

/// Negative log-likelihood signal `(ŷ - y) ⊙ f'(z) / (ŷ(1 - ŷ))`.
fn likelihood_signal(link: Activation, y_hat: &[f64], y: &[f64], z: &[f64]) -> MlResult<Vec<f64>> {
    let mut signal = gradient_signal(link, y_hat, y, z)?;
    for (s, &p) in signal.iter_mut().zip(y_hat) {
        *s /= (p * (1.0 - p)).max(VARIANCE_FLOOR);
    }
    Ok(signal)
}

/// Descend by `lr · grad / n`, regularize the weights, then move the bias.
fn apply_step<M: Trainable>(model: &mut M, grad: &[f64], bias_grad: f64, n: usize, learning_rate: f64) {
    let scale = learning_rate / n as f64;
    let reg = *model.regularization();
    let params = model.parameters_mut();
    for (w, g) in params.weights.iter_mut().zip(grad) {
        *w -= scale * g;
    }
    params.weights = reg_weights(&params.weights, &reg);
    params.bias -= scale * bias_grad;
}

fn with_bias_column(x: &Matrix) -> Matrix {
    let (n, k) = x.shape();
    let mut out = Matrix::ones(n, k + 1);
    for i in 0..n {
        out.row_mut(i)[..k].copy_from_slice(x.row(i));
    }
    out
}
