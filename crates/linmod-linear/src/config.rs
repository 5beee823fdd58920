use linmod_core::{MlError, MlResult};
use linmod_data::WeightInit;
use linmod_optim::Verbosity;
use linmod_regularization::{Regularization, RegularizationConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Hyperparameters shared by every estimator.
///
/// Missing JSON fields fall back to [`Default`]: no penalty, U[0, 1) weights,
/// entropy seeding and silent training.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub regularization: RegularizationConfig,
    pub weight_init: WeightInit,
    pub seed: Option<u64>,
    pub verbosity: Verbosity,
}

impl ModelConfig {
    pub fn new(kind: Regularization, lambda: f64, alpha: f64) -> Self {
        ModelConfig {
            regularization: RegularizationConfig::new(kind, lambda, alpha),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_weight_init(mut self, weight_init: WeightInit) -> Self {
        self.weight_init = weight_init;
        self
    }

    pub fn from_json_str(json: &str) -> MlResult<Self> {
        let config: ModelConfig =
            serde_json::from_str(json).map_err(|e| MlError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MlResult<()> {
        self.regularization.validate()
    }

    /// Random source for initialization and SGD draws.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let c = ModelConfig::default();
        assert_eq!(c.regularization.kind, Regularization::None);
        assert_eq!(c.weight_init, WeightInit::default());
        assert_eq!(c.seed, None);
        assert_eq!(c.verbosity, Verbosity::Silent);
    }

    #[test]
    fn test_from_json_partial() {
        let c = ModelConfig::from_json_str(
            r#"{"regularization": {"kind": "Ridge", "lambda": 0.5, "alpha": 0.0}, "seed": 7}"#,
        )
        .unwrap();
        assert_eq!(c.regularization, RegularizationConfig::ridge(0.5));
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.verbosity, Verbosity::Silent);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            ModelConfig::from_json_str("{not json"),
            Err(MlError::Parse(_))
        ));
        let negative = r#"{"regularization": {"kind": "Lasso", "lambda": -1.0, "alpha": 0.0}}"#;
        assert!(matches!(
            ModelConfig::from_json_str(negative),
            Err(MlError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_json_unknown_weight_init_falls_back() {
        let config = ModelConfig::from_json_str(r#"{"weight_init": "Banana", "seed": 4}"#).unwrap();
        assert_eq!(config.weight_init, WeightInit::Default);
        assert_eq!(config.seed, Some(4));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let c = ModelConfig::default().with_seed(3);
        let a: f64 = c.rng().gen();
        let b: f64 = c.rng().gen();
        assert_eq!(a, b);
    }
}
