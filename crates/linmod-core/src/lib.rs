pub mod error;
pub mod matrix;
pub mod params;
pub mod vector;

pub use error::{Degeneracy, MlError, MlResult};
pub use matrix::Matrix;
pub use params::Parameters;
