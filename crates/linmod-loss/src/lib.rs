pub mod cost;
pub mod svm;

pub use cost::*;
pub use svm::*;
