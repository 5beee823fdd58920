pub mod logger;
pub mod optimizer;

pub use logger::{TrainingLogger, Verbosity};
pub use optimizer::{gradient_signal, Optimizer, Trainable, TrainingHistory};
