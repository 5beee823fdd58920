use linmod_core::{Matrix, MlError, MlResult};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Weight initialisation scheme.
///
/// `fan_in` is the number of inputs; vectors have `fan_out = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightInit {
    /// N(0, √(2 / (fan_in + fan_out)))
    XavierNormal,
    /// U(±√6 / √(fan_in + fan_out))
    XavierUniform,
    /// N(0, √(2 / fan_in))
    HeNormal,
    /// U(±√(6 / fan_in))
    HeUniform,
    /// N(0, √(1 / fan_in))
    LeCunNormal,
    /// U(±√(3 / fan_in))
    LeCunUniform,
    /// U(±1 / √fan_in)
    Uniform,
    /// U[0, 1); also what unknown names deserialize to.
    #[default]
    #[serde(other)]
    Default,
}

impl From<&str> for WeightInit {
    /// Unrecognised names fall back to [`WeightInit::Default`].
    fn from(name: &str) -> Self {
        match name {
            "XavierNormal" => WeightInit::XavierNormal,
            "XavierUniform" => WeightInit::XavierUniform,
            "HeNormal" => WeightInit::HeNormal,
            "HeUniform" => WeightInit::HeUniform,
            "LeCunNormal" => WeightInit::LeCunNormal,
            "LeCunUniform" => WeightInit::LeCunUniform,
            "Uniform" => WeightInit::Uniform,
            _ => WeightInit::Default,
        }
    }
}

enum Sampler {
    Normal(Normal<f64>),
    Uniform(Uniform<f64>),
}

impl Sampler {
    fn for_scheme(scheme: WeightInit, fan_in: usize, fan_out: usize) -> MlResult<Self> {
        let fan_in = fan_in as f64;
        let fan_sum = fan_in + fan_out as f64;
        let normal = |std: f64| {
            Normal::new(0.0, std)
                .map(Sampler::Normal)
                .map_err(|e| MlError::InvalidParameter(format!("normal std {}: {}", std, e)))
        };
        let symmetric = |bound: f64| -> MlResult<Sampler> {
            Ok(Sampler::Uniform(Uniform::new_inclusive(-bound, bound)))
        };
        match scheme {
            WeightInit::XavierNormal => normal((2.0 / fan_sum).sqrt()),
            WeightInit::XavierUniform => symmetric(6f64.sqrt() / fan_sum.sqrt()),
            WeightInit::HeNormal => normal((2.0 / fan_in).sqrt()),
            WeightInit::HeUniform => symmetric((6.0 / fan_in).sqrt()),
            WeightInit::LeCunNormal => normal((1.0 / fan_in).sqrt()),
            WeightInit::LeCunUniform => symmetric((3.0 / fan_in).sqrt()),
            WeightInit::Uniform => symmetric(1.0 / fan_in.sqrt()),
            WeightInit::Default => Ok(Sampler::Uniform(Uniform::new(0.0, 1.0))),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Normal(d) => d.sample(rng),
            Sampler::Uniform(d) => d.sample(rng),
        }
    }
}

/// Draw `n` initial weights.
pub fn weight_initialization<R: Rng + ?Sized>(
    n: usize,
    scheme: WeightInit,
    rng: &mut R,
) -> MlResult<Vec<f64>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let sampler = Sampler::for_scheme(scheme, n, 1)?;
    Ok((0..n).map(|_| sampler.sample(rng)).collect())
}

/// Draw an `n × m` weight matrix (`n` inputs, `m` outputs).
pub fn weight_initialization_matrix<R: Rng + ?Sized>(
    n: usize,
    m: usize,
    scheme: WeightInit,
    rng: &mut R,
) -> MlResult<Matrix> {
    if n == 0 || m == 0 {
        return Ok(Matrix::zeros(n, m));
    }
    let sampler = Sampler::for_scheme(scheme, n, m)?;
    let data = (0..n * m).map(|_| sampler.sample(rng)).collect();
    Matrix::new(data, n, m)
}

/// Initial bias drawn from U[0, 1).
pub fn bias_initialization<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

/// `n` initial biases drawn from U[0, 1).
pub fn bias_initialization_vec<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| bias_initialization(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 16;
        let w = weight_initialization(n, WeightInit::Uniform, &mut rng).unwrap();
        assert_eq!(w.len(), n);
        let bound = 1.0 / (n as f64).sqrt();
        assert!(w.iter().all(|v| v.abs() <= bound));
    }

    #[test]
    fn test_default_is_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = weight_initialization(50, WeightInit::from("Banana"), &mut rng).unwrap();
        assert!(w.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_he_uniform_matrix_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let m = weight_initialization_matrix(6, 4, WeightInit::HeUniform, &mut rng).unwrap();
        assert_eq!(m.shape(), (6, 4));
        let bound = (6.0f64 / 6.0).sqrt();
        assert!(m.data().iter().all(|v| v.abs() <= bound));
    }

    #[test]
    fn test_normal_schemes_have_roughly_right_spread() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 4;
        let draws: Vec<f64> = (0..2000)
            .flat_map(|_| weight_initialization(n, WeightInit::HeNormal, &mut rng).unwrap())
            .collect();
        let var = draws.iter().map(|v| v * v).sum::<f64>() / draws.len() as f64;
        // He normal: variance 2 / fan_in = 0.5
        assert!((var - 0.5).abs() < 0.05, "variance {}", var);
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let a = weight_initialization(5, WeightInit::XavierNormal, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = weight_initialization(5, WeightInit::XavierNormal, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_shapes() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(weight_initialization(0, WeightInit::LeCunNormal, &mut rng).unwrap().is_empty());
        let m = weight_initialization_matrix(0, 3, WeightInit::XavierUniform, &mut rng).unwrap();
        assert_eq!(m.shape(), (0, 3));
    }

    #[test]
    fn test_bias_initialization() {
        let mut rng = StdRng::seed_from_u64(5);
        let b = bias_initialization_vec(20, &mut rng);
        assert_eq!(b.len(), 20);
        assert!(b.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
