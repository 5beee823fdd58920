use std::fmt;
use std::str::FromStr;

use linmod_core::vector::sign;
use linmod_core::{Matrix, MlError, MlResult};
use serde::{Deserialize, Serialize};

/// Penalty kind applied to model weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Regularization {
    /// No penalty: zero term, zero gradient, identity update.
    #[default]
    None,
    Ridge,
    Lasso,
    ElasticNet,
    /// Clamp weights into `[lambda, alpha]`.
    WeightClipping,
}

impl fmt::Display for Regularization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regularization::None => "None",
            Regularization::Ridge => "Ridge",
            Regularization::Lasso => "Lasso",
            Regularization::ElasticNet => "ElasticNet",
            Regularization::WeightClipping => "WeightClipping",
        };
        f.write_str(name)
    }
}

impl FromStr for Regularization {
    type Err = MlError;

    fn from_str(s: &str) -> MlResult<Self> {
        match s {
            "None" => Ok(Regularization::None),
            "Ridge" => Ok(Regularization::Ridge),
            "Lasso" => Ok(Regularization::Lasso),
            "ElasticNet" => Ok(Regularization::ElasticNet),
            "WeightClipping" => Ok(Regularization::WeightClipping),
            other => Err(MlError::Parse(format!(
                "unknown regularization '{}'",
                other
            ))),
        }
    }
}

/// Regularization settings of a model.
///
/// For [`Regularization::WeightClipping`] the pair `(lambda, alpha)` is the
/// clipping range `(lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegularizationConfig {
    pub kind: Regularization,
    pub lambda: f64,
    pub alpha: f64,
}

impl RegularizationConfig {
    pub fn new(kind: Regularization, lambda: f64, alpha: f64) -> Self {
        RegularizationConfig {
            kind,
            lambda,
            alpha,
        }
    }

    pub fn ridge(lambda: f64) -> Self {
        Self::new(Regularization::Ridge, lambda, 0.0)
    }

    pub fn lasso(lambda: f64) -> Self {
        Self::new(Regularization::Lasso, lambda, 0.0)
    }

    pub fn elastic_net(lambda: f64, alpha: f64) -> Self {
        Self::new(Regularization::ElasticNet, lambda, alpha)
    }

    pub fn clipping(lower: f64, upper: f64) -> Self {
        Self::new(Regularization::WeightClipping, lower, upper)
    }

    /// Check `lambda ≥ 0` and `alpha ∈ [0, 1]`, or `lower ≤ upper` for
    /// clipping.
    pub fn validate(&self) -> MlResult<()> {
        match self.kind {
            Regularization::None => Ok(()),
            Regularization::WeightClipping => {
                if self.lambda <= self.alpha {
                    Ok(())
                } else {
                    Err(MlError::InvalidParameter(format!(
                        "clipping range [{}, {}] is empty",
                        self.lambda, self.alpha
                    )))
                }
            }
            _ => {
                if !(self.lambda >= 0.0) {
                    return Err(MlError::InvalidParameter(format!(
                        "lambda must be non-negative, got {}",
                        self.lambda
                    )));
                }
                if !(0.0..=1.0).contains(&self.alpha) {
                    return Err(MlError::InvalidParameter(format!(
                        "alpha must lie in [0, 1], got {}",
                        self.alpha
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Penalty added to the cost.
pub fn reg_term(w: &[f64], reg: &RegularizationConfig) -> f64 {
    let RegularizationConfig { kind, lambda, alpha } = *reg;
    match kind {
        Regularization::Ridge => lambda * w.iter().map(|x| x * x).sum::<f64>() / 2.0,
        Regularization::Lasso => lambda * w.iter().map(|x| x.abs()).sum::<f64>(),
        Regularization::ElasticNet => {
            lambda
                * w.iter()
                    .map(|x| alpha * x.abs() + (1.0 - alpha) * x * x / 2.0)
                    .sum::<f64>()
        }
        Regularization::None | Regularization::WeightClipping => 0.0,
    }
}

/// [`reg_term`] summed over every entry.
pub fn reg_term_matrix(w: &Matrix, reg: &RegularizationConfig) -> f64 {
    reg_term(w.data(), reg)
}

fn reg_deriv_scalar(x: f64, reg: &RegularizationConfig) -> f64 {
    let RegularizationConfig { kind, lambda, alpha } = *reg;
    match kind {
        Regularization::Ridge => lambda * x,
        Regularization::Lasso => lambda * sign(x),
        Regularization::ElasticNet => lambda * (alpha * sign(x) + (1.0 - alpha) * x),
        Regularization::WeightClipping => {
            let (lower, upper) = (lambda, alpha);
            if x < lower {
                lower
            } else if x > upper {
                upper
            } else {
                0.0
            }
        }
        Regularization::None => 0.0,
    }
}

/// Element-wise gradient of [`reg_term`].
///
/// `WeightClipping` instead reports the bound each weight violates, or 0.
pub fn reg_deriv_term(w: &[f64], reg: &RegularizationConfig) -> Vec<f64> {
    w.iter().map(|&x| reg_deriv_scalar(x, reg)).collect()
}

pub fn reg_deriv_term_matrix(w: &Matrix, reg: &RegularizationConfig) -> Matrix {
    w.map(|x| reg_deriv_scalar(x, reg))
}

fn reg_weight_scalar(x: f64, reg: &RegularizationConfig) -> f64 {
    match reg.kind {
        Regularization::None => x,
        Regularization::WeightClipping => x.max(reg.lambda).min(reg.alpha),
        _ => x - reg_deriv_scalar(x, reg),
    }
}

/// One regularization step on the weights.
///
/// Penalties subtract their gradient, clipping clamps into
/// `[lower, upper]`, and `None` leaves the weights untouched.
pub fn reg_weights(w: &[f64], reg: &RegularizationConfig) -> Vec<f64> {
    w.iter().map(|&x| reg_weight_scalar(x, reg)).collect()
}

pub fn reg_weights_matrix(w: &Matrix, reg: &RegularizationConfig) -> Matrix {
    w.map(|x| reg_weight_scalar(x, reg))
}
