pub mod cloglog;
pub mod config;
pub mod glm;
pub mod logistic;
pub mod probit;
pub mod regression;
pub mod tanh;
pub mod univariate;

pub use cloglog::*;
pub use config::*;
pub use glm::*;
pub use logistic::*;
pub use probit::*;
pub use regression::*;
pub use tanh::*;
pub use univariate::*;
