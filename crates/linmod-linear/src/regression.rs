use linmod_activation::Activation;
use linmod_core::vector::{dot, mean};
use linmod_core::{Degeneracy, Matrix, MlError, MlResult, Parameters};
use linmod_linalg::{gram_conditioning, gram_matrix, inverse};
use linmod_loss::CostFunction;
use linmod_metrics::r2_score;
use linmod_optim::{Optimizer, Trainable, TrainingHistory};
use linmod_regularization::Regularization;

use crate::config::ModelConfig;
use crate::glm::{Glm, GlmEstimator};

/// Below this `det(G) / Π G_ii` the normal matrix is treated as singular.
const CONDITIONING_FLOOR: f64 = 1e-10;

/// Ordinary least-squares regression with an identity link.
#[derive(Debug, Clone)]
pub struct LinReg {
    glm: Glm,
    optimizer: Optimizer,
}

impl LinReg {
    pub fn new(x: Matrix, y: Vec<f64>, config: ModelConfig) -> MlResult<Self> {
        let (glm, optimizer) = Glm::with_optimizer(x, y, Activation::Linear, CostFunction::Mse, &config)?;
        Ok(LinReg { glm, optimizer })
    }

    /// Damped Newton steps; one step with `learning_rate = 1` solves least
    /// squares exactly when `XᵀX` is invertible.
    pub fn newton_raphson(&mut self, learning_rate: f64, max_epoch: usize) -> MlResult<TrainingHistory> {
        self.optimizer.newton_raphson(&mut self.glm, learning_rate, max_epoch)
    }

    /// Closed-form least squares on centred data.
    ///
    /// Solves `(XcᵀXc + λI) w = Xcᵀyc` (the `λI` shift only for ridge) and
    /// sets `b = ȳ - w·x̄`. Fails with [`MlError::Degenerate`] when there are
    /// fewer samples than features, or the normal matrix is singular; the
    /// parameters are left untouched in that case.
    pub fn normal_equation(&mut self) -> MlResult<()> {
        let x = self.glm.input_set();
        let y = self.glm.output_set();
        let (n, k) = x.shape();
        if n < k || n < 2 {
            return Err(MlError::Degenerate(Degeneracy::Underdetermined {
                samples: n,
                features: k,
            }));
        }

        let x_mean: Vec<f64> = (0..k).map(|j| mean(&x.col(j))).collect();
        let y_mean = mean(y);
        let mut xc = x.clone();
        for i in 0..n {
            for (v, m) in xc.row_mut(i).iter_mut().zip(&x_mean) {
                *v -= m;
            }
        }
        let yc: Vec<f64> = y.iter().map(|v| v - y_mean).collect();

        let mut g = gram_matrix(&xc);
        let reg = self.glm.regularization();
        if reg.kind == Regularization::Ridge {
            for j in 0..k {
                g[(j, j)] += reg.lambda;
            }
        }

        let conditioning = gram_conditioning(&g)?;
        if !conditioning.is_finite() || conditioning < CONDITIONING_FLOOR {
            return Err(MlError::Degenerate(Degeneracy::Singular));
        }
        let g_inv = inverse(&g)?;
        if !g_inv.is_finite() {
            return Err(MlError::Degenerate(Degeneracy::Singular));
        }

        let weights = g_inv.mat_vec(&xc.t_mat_vec(&yc)?)?;
        let bias = y_mean - dot(&weights, &x_mean)?;
        self.glm.set_parameters(Parameters::new(weights, bias))
    }
}

impl GlmEstimator for LinReg {
    fn glm(&self) -> &Glm {
        &self.glm
    }

    fn parts_mut(&mut self) -> (&mut Glm, &mut Optimizer) {
        (&mut self.glm, &mut self.optimizer)
    }

    /// R² on the training set.
    fn score(&self) -> MlResult<f64> {
        r2_score(self.glm.output_set(), self.glm.y_hat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn plane() -> LinReg {
        // y = 2·x1 - x2 + 0.5
        let x = Matrix::from_rows(&[
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![2.0, 1.0],
        ])
        .unwrap();
        let y = vec![0.5, 2.5, -0.5, 1.5, 3.5];
        LinReg::new(x, y, ModelConfig::default().with_seed(0)).unwrap()
    }

    #[test]
    fn test_normal_equation_recovers_plane() {
        let mut model = plane();
        model.normal_equation().unwrap();
        assert_abs_diff_eq!(model.weights()[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.weights()[1], -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.bias(), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(model.score().unwrap(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.model_test(&[3.0, 2.0]).unwrap(), 4.5, epsilon = 1e-9);
    }

    #[test]
    fn test_normal_equation_rejects_collinear_columns() {
        let x = Matrix::from_rows(&[
            vec![1.0, 2.0],
            vec![2.0, 4.0],
            vec![3.0, 6.0],
            vec![4.0, 8.0],
        ])
        .unwrap();
        let mut model = LinReg::new(x, vec![1.0, 2.0, 3.0, 4.0], ModelConfig::default().with_seed(0)).unwrap();
        let before = model.parameters().clone();
        assert_eq!(
            model.normal_equation(),
            Err(MlError::Degenerate(Degeneracy::Singular))
        );
        assert_eq!(model.parameters(), &before);
    }

    #[test]
    fn test_normal_equation_rejects_underdetermined() {
        let x = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let mut model = LinReg::new(x, vec![1.0, 2.0], ModelConfig::default().with_seed(0)).unwrap();
        assert_eq!(
            model.normal_equation(),
            Err(MlError::Degenerate(Degeneracy::Underdetermined {
                samples: 2,
                features: 3
            }))
        );
    }

    #[test]
    fn test_ridge_normal_equation_shrinks_and_regularizes() {
        let x = Matrix::from_rows(&[
            vec![1.0, 2.0],
            vec![2.0, 4.0],
            vec![3.0, 6.0],
            vec![4.0, 8.0],
        ])
        .unwrap();
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let config = ModelConfig::new(Regularization::Ridge, 1.0, 0.0).with_seed(0);
        let mut model = LinReg::new(x, y, config).unwrap();
        model.normal_equation().unwrap();
        // Ridge keeps the solution on the collinear direction (1, 2).
        assert_abs_diff_eq!(model.weights()[1], 2.0 * model.weights()[0], epsilon = 1e-9);
        assert!(model.weights()[0] > 0.0 && model.weights()[0] < 0.2);
    }

    #[test]
    fn test_gradient_descent_line() {
        let x = Matrix::column(&[1.0, 2.0, 3.0, 4.0]);
        let mut model = LinReg::new(x, vec![3.0, 5.0, 7.0, 9.0], ModelConfig::default().with_seed(5)).unwrap();
        let history = model.gradient_descent(0.1, 1000).unwrap();
        assert_eq!(history.len(), 1000);

        let preds = model.model_set_test(&Matrix::column(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        for (p, t) in preds.iter().zip([3.0, 5.0, 7.0, 9.0]) {
            assert!((p - t).abs() < 1e-2);
        }
    }

    #[test]
    fn test_newton_raphson_matches_normal_equation() {
        let mut a = plane();
        let mut b = plane();
        a.normal_equation().unwrap();
        b.newton_raphson(1.0, 1).unwrap();
        for (wa, wb) in a.weights().iter().zip(b.weights()) {
            assert_abs_diff_eq!(*wa, *wb, epsilon = 1e-8);
        }
        assert_abs_diff_eq!(a.bias(), b.bias(), epsilon = 1e-8);
    }

    #[test]
    fn test_newton_raphson_singular_design_is_non_finite() {
        let x = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0], vec![4.0, 8.0]]).unwrap();
        let mut model = LinReg::new(x, vec![3.0, 5.0, 7.0, 9.0], ModelConfig::default().with_seed(6)).unwrap();
        let history = model.newton_raphson(1.0, 3).unwrap();

        assert_eq!(history.len(), 3);
        assert!(model.weights().iter().all(|w| !w.is_finite()));
        assert!(!model.bias().is_finite());
        assert!(!model.score().unwrap().is_finite());
    }

    #[test]
    fn test_stochastic_methods_reduce_cost() {
        let mut model = plane();
        let before = model.cost().unwrap();
        model.sgd(0.05, 3000).unwrap();
        assert!(model.cost().unwrap() < before);

        let mut model = plane();
        model.mini_batch(0.05, 1000, 2).unwrap();
        assert!(model.score().unwrap() > 0.9);
    }
}
