use std::fmt;

use thiserror::Error;

/// Core error type for all linmod operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MlError {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Degenerate system: {0}")]
    Degenerate(Degeneracy),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Why a closed-form solve could not produce weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Fewer samples than unknowns.
    Underdetermined { samples: usize, features: usize },
    /// The normal matrix is singular (duplicate or collinear columns).
    Singular,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::Underdetermined { samples, features } => write!(
                f,
                "underdetermined system ({} samples for {} features)",
                samples, features
            ),
            Degeneracy::Singular => write!(f, "normal matrix is singular or near-singular"),
        }
    }
}

pub type MlResult<T> = Result<T, MlError>;
