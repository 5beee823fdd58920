use std::f64::consts::{PI, SQRT_2};
use std::fmt;
use std::str::FromStr;

use linmod_core::{Matrix, MlError, MlResult};
use statrs::function::erf::erf;

/// Element-wise link functions.
///
/// Every variant maps a scalar `z` to `f(z)` and knows its derivative
/// `f'(z)`. Boundary singularities are kept as the formulas give them:
/// `logit` is infinite at 0 and 1, while `sinc(0)` and `mish'(0)` are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Linear,
    Sigmoid,
    Swish,
    Mish,
    SinC,
    Softplus,
    Softsign,
    CLogLog,
    Logit,
    /// Standard normal CDF, the probit link.
    GaussianCdf,
    Relu,
    /// Tanh approximation of GELU.
    Gelu,
    LeakyRelu { c: f64 },
    Elu { alpha: f64 },
    Selu { lambda: f64, alpha: f64 },
    Sign,
    UnitStep,
    Sinh,
    Cosh,
    Tanh,
    Csch,
    Sech,
    Coth,
    Arsinh,
    Arcosh,
    Artanh,
    Arcsch,
    Arsech,
    Arcoth,
}

pub const SELU_LAMBDA: f64 = 1.050_700_987_355_480_5;
pub const SELU_ALPHA: f64 = 1.673_263_242_354_377_3;

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

pub fn softplus(z: f64) -> f64 {
    (1.0 + z.exp()).ln()
}

pub fn gaussian_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / SQRT_2))
}

/// Standard normal density.
pub fn gaussian_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
}

fn elu(z: f64, alpha: f64) -> f64 {
    if z > 0.0 {
        z
    } else {
        alpha * (z.exp() - 1.0)
    }
}

fn elu_deriv(z: f64, alpha: f64) -> f64 {
    if z > 0.0 {
        1.0
    } else {
        alpha * z.exp()
    }
}

const GELU_K: f64 = 0.044_715;

fn gelu_inner(z: f64) -> f64 {
    (2.0 / PI).sqrt() * (z + GELU_K * z.powi(3))
}

impl Activation {
    /// `f(z)`.
    pub fn apply(&self, z: f64) -> f64 {
        match *self {
            Activation::Linear => z,
            Activation::Sigmoid => sigmoid(z),
            Activation::Swish => z * sigmoid(z),
            Activation::Mish => z * softplus(z).tanh(),
            Activation::SinC => z.sin() / z,
            Activation::Softplus => softplus(z),
            Activation::Softsign => z / (1.0 + z.abs()),
            Activation::CLogLog => 1.0 - (-z.exp()).exp(),
            Activation::Logit => (z / (1.0 - z)).ln(),
            Activation::GaussianCdf => gaussian_cdf(z),
            Activation::Relu => z.max(0.0),
            Activation::Gelu => 0.5 * z * (1.0 + gelu_inner(z).tanh()),
            Activation::LeakyRelu { c } => z.max(c * z),
            Activation::Elu { alpha } => elu(z, alpha),
            Activation::Selu { lambda, alpha } => lambda * elu(z, alpha),
            Activation::Sign => linmod_core::vector::sign(z),
            Activation::UnitStep => {
                if z < 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Activation::Sinh => z.sinh(),
            Activation::Cosh => z.cosh(),
            Activation::Tanh => z.tanh(),
            Activation::Csch => 1.0 / z.sinh(),
            Activation::Sech => 1.0 / z.cosh(),
            Activation::Coth => 1.0 / z.tanh(),
            Activation::Arsinh => z.asinh(),
            Activation::Arcosh => z.acosh(),
            Activation::Artanh => z.atanh(),
            Activation::Arcsch => (1.0 / z + (1.0 / (z * z) + 1.0).sqrt()).ln(),
            Activation::Arsech => (1.0 / z + (1.0 / (z * z) - 1.0).sqrt()).ln(),
            Activation::Arcoth => 0.5 * ((1.0 + z) / (z - 1.0)).ln(),
        }
    }

    /// `f'(z)`.
    pub fn derivative(&self, z: f64) -> f64 {
        match *self {
            Activation::Linear => 1.0,
            Activation::Sigmoid => {
                let s = sigmoid(z);
                s * (1.0 - s)
            }
            Activation::Swish => {
                let s = sigmoid(z);
                s + z * s * (1.0 - s)
            }
            Activation::Mish => {
                let sech = 1.0 / softplus(z).cosh();
                sech * sech * z * sigmoid(z) + self.apply(z) / z
            }
            Activation::SinC => (z * z.cos() - z.sin()) / (z * z),
            Activation::Softplus => sigmoid(z),
            Activation::Softsign => 1.0 / (1.0 + z.abs()).powi(2),
            Activation::CLogLog => (z - z.exp()).exp(),
            Activation::Logit => 1.0 / z - 1.0 / (z - 1.0),
            Activation::GaussianCdf => gaussian_pdf(z),
            Activation::Relu => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Gelu => {
                let t = gelu_inner(z).tanh();
                let inner_deriv = (2.0 / PI).sqrt() * (1.0 + 3.0 * GELU_K * z * z);
                0.5 * (1.0 + t) + 0.5 * z * (1.0 - t * t) * inner_deriv
            }
            Activation::LeakyRelu { c } => {
                if z > 0.0 {
                    1.0
                } else {
                    c
                }
            }
            Activation::Elu { alpha } => elu_deriv(z, alpha),
            Activation::Selu { lambda, alpha } => lambda * elu_deriv(z, alpha),
            Activation::Sign | Activation::UnitStep => 0.0,
            Activation::Sinh => z.cosh(),
            Activation::Cosh => z.sinh(),
            Activation::Tanh => 1.0 - z.tanh().powi(2),
            Activation::Csch => -1.0 / (z.sinh() * z.tanh()),
            Activation::Sech => -z.tanh() / z.cosh(),
            Activation::Coth => -1.0 / z.sinh().powi(2),
            Activation::Arsinh => 1.0 / (z * z + 1.0).sqrt(),
            Activation::Arcosh => 1.0 / (z * z - 1.0).sqrt(),
            Activation::Artanh | Activation::Arcoth => 1.0 / (1.0 - z * z),
            Activation::Arcsch => -1.0 / (z.abs() * (1.0 + z * z).sqrt()),
            Activation::Arsech => -1.0 / (z * (1.0 - z * z).sqrt()),
        }
    }

    /// `f(z)` or `f'(z)` depending on `deriv`.
    pub fn eval(&self, z: f64, deriv: bool) -> f64 {
        if deriv {
            self.derivative(z)
        } else {
            self.apply(z)
        }
    }

    pub fn apply_vec(&self, z: &[f64]) -> Vec<f64> {
        z.iter().map(|&v| self.apply(v)).collect()
    }

    pub fn derivative_vec(&self, z: &[f64]) -> Vec<f64> {
        z.iter().map(|&v| self.derivative(v)).collect()
    }

    pub fn eval_vec(&self, z: &[f64], deriv: bool) -> Vec<f64> {
        z.iter().map(|&v| self.eval(v, deriv)).collect()
    }

    pub fn apply_matrix(&self, z: &Matrix) -> Matrix {
        z.map(|v| self.apply(v))
    }

    pub fn derivative_matrix(&self, z: &Matrix) -> Matrix {
        z.map(|v| self.derivative(v))
    }

    pub fn eval_matrix(&self, z: &Matrix, deriv: bool) -> Matrix {
        z.map(|v| self.eval(v, deriv))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Linear => "Linear",
            Activation::Sigmoid => "Sigmoid",
            Activation::Swish => "Swish",
            Activation::Mish => "Mish",
            Activation::SinC => "SinC",
            Activation::Softplus => "Softplus",
            Activation::Softsign => "Softsign",
            Activation::CLogLog => "CLogLog",
            Activation::Logit => "Logit",
            Activation::GaussianCdf => "GaussianCDF",
            Activation::Relu => "RELU",
            Activation::Gelu => "GELU",
            Activation::LeakyRelu { .. } => "LeakyReLU",
            Activation::Elu { .. } => "ELU",
            Activation::Selu { .. } => "SELU",
            Activation::Sign => "Sign",
            Activation::UnitStep => "UnitStep",
            Activation::Sinh => "Sinh",
            Activation::Cosh => "Cosh",
            Activation::Tanh => "Tanh",
            Activation::Csch => "Csch",
            Activation::Sech => "Sech",
            Activation::Coth => "Coth",
            Activation::Arsinh => "Arsinh",
            Activation::Arcosh => "Arcosh",
            Activation::Artanh => "Artanh",
            Activation::Arcsch => "Arcsch",
            Activation::Arsech => "Arsech",
            Activation::Arcoth => "Arcoth",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = MlError;

    /// Parameterised variants get their conventional defaults.
    fn from_str(s: &str) -> MlResult<Self> {
        let act = match s {
            "Linear" => Activation::Linear,
            "Sigmoid" => Activation::Sigmoid,
            "Swish" => Activation::Swish,
            "Mish" => Activation::Mish,
            "SinC" => Activation::SinC,
            "Softplus" => Activation::Softplus,
            "Softsign" => Activation::Softsign,
            "CLogLog" => Activation::CLogLog,
            "Logit" => Activation::Logit,
            "GaussianCDF" => Activation::GaussianCdf,
            "RELU" => Activation::Relu,
            "GELU" => Activation::Gelu,
            "LeakyReLU" => Activation::LeakyRelu { c: 0.01 },
            "ELU" => Activation::Elu { alpha: 1.0 },
            "SELU" => Activation::Selu {
                lambda: SELU_LAMBDA,
                alpha: SELU_ALPHA,
            },
            "Sign" => Activation::Sign,
            "UnitStep" => Activation::UnitStep,
            "Sinh" => Activation::Sinh,
            "Cosh" => Activation::Cosh,
            "Tanh" => Activation::Tanh,
            "Csch" => Activation::Csch,
            "Sech" => Activation::Sech,
            "Coth" => Activation::Coth,
            "Arsinh" => Activation::Arsinh,
            "Arcosh" => Activation::Arcosh,
            "Artanh" => Activation::Artanh,
            "Arcsch" => Activation::Arcsch,
            "Arsech" => Activation::Arsech,
            "Arcoth" => Activation::Arcoth,
            other => {
                return Err(MlError::Parse(format!("unknown activation '{}'", other)));
            }
        };
        Ok(act)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn numeric_deriv(f: Activation, z: f64) -> f64 {
        let h = 1e-6;
        (f.apply(z + h) - f.apply(z - h)) / (2.0 * h)
    }

    fn check_deriv(f: Activation, points: &[f64]) {
        for &z in points {
            let analytic = f.derivative(z);
            let numeric = numeric_deriv(f, z);
            assert!(
                (analytic - numeric).abs() < 1e-5,
                "{} at {}: analytic {} vs numeric {}",
                f,
                z,
                analytic,
                numeric
            );
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);
        assert_abs_diff_eq!(Activation::GaussianCdf.apply(0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(Activation::GaussianCdf.apply(1.96), 0.975, epsilon = 1e-3);
        assert_abs_diff_eq!(Activation::Softplus.apply(0.0), 2f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(Activation::CLogLog.apply(0.0), 1.0 - (-1f64).exp(), epsilon = 1e-12);
        assert_eq!(Activation::Relu.apply(-2.0), 0.0);
        assert_eq!(Activation::LeakyRelu { c: 0.1 }.apply(-2.0), -0.2);
        assert_eq!(Activation::UnitStep.apply(0.0), 1.0);
        assert_eq!(Activation::Sign.apply(0.0), 0.0);
        assert_eq!(Activation::Softsign.apply(1.0), 0.5);
    }

    #[test]
    fn test_smooth_derivatives_match_finite_differences() {
        let wide = [-2.5, -0.7, 0.3, 1.9];
        for f in [
            Activation::Linear,
            Activation::Sigmoid,
            Activation::Swish,
            Activation::Softplus,
            Activation::CLogLog,
            Activation::GaussianCdf,
            Activation::Gelu,
            Activation::Sinh,
            Activation::Cosh,
            Activation::Tanh,
            Activation::Arsinh,
            Activation::Mish,
            Activation::SinC,
            Activation::Softsign,
            Activation::Csch,
            Activation::Sech,
            Activation::Coth,
            Activation::Arcsch,
            Activation::Elu { alpha: 1.0 },
            Activation::Selu {
                lambda: SELU_LAMBDA,
                alpha: SELU_ALPHA,
            },
            Activation::LeakyRelu { c: 0.01 },
        ] {
            check_deriv(f, &wide);
        }
        check_deriv(Activation::Logit, &[0.1, 0.5, 0.8]);
        check_deriv(Activation::Artanh, &[-0.6, 0.2, 0.7]);
        check_deriv(Activation::Arsech, &[0.2, 0.5, 0.9]);
        check_deriv(Activation::Arcosh, &[1.5, 3.0]);
        check_deriv(Activation::Arcoth, &[-3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_boundary_singularities_are_preserved() {
        assert_eq!(Activation::Logit.apply(0.0), f64::NEG_INFINITY);
        assert_eq!(Activation::Logit.apply(1.0), f64::INFINITY);
        assert!(Activation::SinC.apply(0.0).is_nan());
        assert!(Activation::Mish.derivative(0.0).is_nan());
    }

    #[test]
    fn test_eval_flag() {
        let f = Activation::Tanh;
        assert_eq!(f.eval(0.5, false), 0.5f64.tanh());
        assert_eq!(f.eval(0.5, true), f.derivative(0.5));
    }

    #[test]
    fn test_vector_and_matrix_forms() {
        let f = Activation::Sigmoid;
        let z = [-1.0, 0.0, 1.0];
        let out = f.apply_vec(&z);
        assert_eq!(out[1], 0.5);
        assert_abs_diff_eq!(out[0] + out[2], 1.0, epsilon = 1e-12);

        let m = Matrix::from_rows(&[vec![0.0, 1.0], vec![-1.0, 2.0]]).unwrap();
        let d = f.derivative_matrix(&m);
        assert_eq!(d[(0, 0)], 0.25);
        assert_eq!(f.eval_matrix(&m, false)[(1, 1)], sigmoid(2.0));
    }

    #[test]
    fn test_from_str_round_trips_names() {
        for name in ["Sigmoid", "GaussianCDF", "CLogLog", "RELU", "Arcoth", "SELU"] {
            let act: Activation = name.parse().unwrap();
            assert_eq!(act.to_string(), name);
        }
        assert!(matches!(
            "Gaussian".parse::<Activation>(),
            Err(MlError::Parse(_))
        ));
    }
}
