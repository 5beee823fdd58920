pub mod reg;

pub use reg::*;
