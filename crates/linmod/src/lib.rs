//! # linmod
//!
//! Dense linear algebra, link functions and a family of linear-model
//! estimators sharing one training engine.
//!
//! ## Modules
//!
//! - **core** — `Matrix`, vector arithmetic, `Parameters`, `MlError`
//! - **linalg** — determinant, adjugate, inverse, pseudoinverse, QR, Gram and Kronecker products
//! - **activation** — link functions with derivatives, softmax and its Jacobian
//! - **loss** — MSE, RMSE, MAE, MBE, log loss, cross-entropy, hinge, Huber, Wasserstein, SVM dual
//! - **regularization** — Ridge, Lasso, ElasticNet and weight clipping
//! - **data** — weight/bias initialisation, mini-batches
//! - **metrics** — rounded-match accuracy, precision, recall, F1, R²
//! - **optim** — gradient descent, SGD, mini-batch, Newton-Raphson and MLE loops
//! - **linear** — LinReg, LogReg, ProbitReg, CLogLogReg, TanhReg, UniLinReg
//! - **nn** — hidden layer
//! - **io** — parameter persistence and CSV datasets

/// Matrix, vector and parameter types.
pub use linmod_core as core;

/// Linear algebra operations.
pub use linmod_linalg as linalg;

/// Link functions.
pub use linmod_activation as activation;

/// Loss functions.
pub use linmod_loss as loss;

/// Weight penalties.
pub use linmod_regularization as regularization;

/// Initialisation and batching utilities.
pub use linmod_data as data;

/// Evaluation metrics.
pub use linmod_metrics as metrics;

/// Training loops.
pub use linmod_optim as optim;

/// Linear-model estimators.
pub use linmod_linear as linear;

/// Neural network layers.
pub use linmod_nn as nn;

/// I/O utilities.
pub use linmod_io as io;
