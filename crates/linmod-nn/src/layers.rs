use linmod_activation::Activation;
use linmod_core::{Matrix, MlError, MlResult};
use linmod_data::{bias_initialization_vec, weight_initialization_matrix, WeightInit};
use rand::Rng;

/// Trait for a network layer.
pub trait Layer {
    /// Forward pass over a batch, one sample per row.
    fn forward(&self, input: &Matrix) -> MlResult<Matrix>;
    /// Number of units the layer outputs.
    fn n_outputs(&self) -> usize;
}

/// Fully connected layer `a = f(XW + b)` bound to its input batch.
///
/// `W` is `k × n_hidden` for `k` input features. `z` and `a` cache the last
/// forward pass over the bound input.
#[derive(Debug, Clone)]
pub struct HiddenLayer {
    n_hidden: usize,
    activation: Activation,
    input: Matrix,
    weights: Matrix,
    bias: Vec<f64>,
    z: Matrix,
    a: Matrix,
}

impl HiddenLayer {
    pub fn new<R: Rng + ?Sized>(
        n_hidden: usize,
        activation: Activation,
        input: Matrix,
        weight_init: WeightInit,
        rng: &mut R,
    ) -> MlResult<Self> {
        if n_hidden == 0 {
            return Err(MlError::InvalidParameter("a hidden layer needs at least one unit".into()));
        }
        let weights = weight_initialization_matrix(input.cols(), n_hidden, weight_init, rng)?;
        let bias = bias_initialization_vec(n_hidden, rng);
        Ok(HiddenLayer {
            n_hidden,
            activation,
            input,
            weights,
            bias,
            z: Matrix::zeros(0, 0),
            a: Matrix::zeros(0, 0),
        })
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn input(&self) -> &Matrix {
        &self.input
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut Matrix {
        &mut self.weights
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    pub fn bias_mut(&mut self) -> &mut [f64] {
        &mut self.bias
    }

    /// Pre-activations of the last forward pass.
    pub fn z(&self) -> &Matrix {
        &self.z
    }

    /// Activations of the last forward pass.
    pub fn a(&self) -> &Matrix {
        &self.a
    }

    /// `f'(z)` of the last forward pass, for backpropagation.
    pub fn activation_derivative(&self) -> Matrix {
        self.activation.derivative_matrix(&self.z)
    }

    /// Swap the bound input batch; the feature count must stay the same.
    pub fn set_input(&mut self, input: Matrix) -> MlResult<()> {
        if input.cols() != self.weights.rows() {
            return Err(MlError::ShapeMismatch {
                expected: vec![input.rows(), self.weights.rows()],
                got: vec![input.rows(), input.cols()],
            });
        }
        self.input = input;
        Ok(())
    }

    /// Recompute `z = XW + b` and `a = f(z)` for the bound input.
    pub fn forward_pass(&mut self) -> MlResult<()> {
        let z = self.pre_activation(&self.input)?;
        self.a = self.activation.apply_matrix(&z);
        self.z = z;
        Ok(())
    }

    /// `f(Wᵀx + b)` for a single sample.
    pub fn test(&self, x: &[f64]) -> MlResult<Vec<f64>> {
        let z = self.weights.t_mat_vec(x)?;
        Ok(z.iter()
            .zip(&self.bias)
            .map(|(zi, bi)| self.activation.apply(zi + bi))
            .collect())
    }

    fn pre_activation(&self, x: &Matrix) -> MlResult<Matrix> {
        let mut z = x.matmul(&self.weights)?;
        for i in 0..z.rows() {
            for (v, b) in z.row_mut(i).iter_mut().zip(&self.bias) {
                *v += b;
            }
        }
        Ok(z)
    }
}

impl Layer for HiddenLayer {
    fn forward(&self, input: &Matrix) -> MlResult<Matrix> {
        Ok(self.activation.apply_matrix(&self.pre_activation(input)?))
    }

    fn n_outputs(&self) -> usize {
        self.n_hidden
    }
}
