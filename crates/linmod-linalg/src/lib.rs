pub mod decomposition;
pub mod products;
pub mod solve;

pub use decomposition::*;
pub use products::*;
pub use solve::*;
