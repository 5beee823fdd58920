pub mod activation;
pub mod softmax;

pub use activation::*;
pub use softmax::*;
