use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::math::matrix::Matrix;
use crate::network::spec::InitScheme;
use crate::train::train_config::GradientAveraging;

/// One fully-connected layer: `a = f(x · W + b)`.
///
/// `weights` is `(input_size × size)`, `biases` is `(1 × size)`.
#[derive(Debug, Clone)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    /// Inverted-dropout rate applied to this layer's activation while training.
    pub dropout: f64,
}

/// Gradients for one layer plus the error signal to hand to the layer below.
#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Matrix,
    /// ∂L/∂x for this layer's input (i.e. the previous layer's activation).
    /// `None` when the caller had no layer below to hand it to.
    pub input_error: Option<Matrix>,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        init: InitScheme,
        dropout: f64,
        rng: &mut R,
    ) -> Layer {
        let weights = match init {
            InitScheme::He => Matrix::he(input_size, size, rng),
            InitScheme::Xavier => Matrix::xavier(input_size, size, rng),
        };

        Layer {
            weights,
            biases: Matrix::zeros(1, size),
            activator: activation,
            dropout,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Returns `(z, a)`: the pre-activation sum and the activation.
    pub fn feed_from(&self, input: &Matrix) -> (Matrix, Matrix) {
        let z = (input * &self.weights).add_row(&self.biases);
        let a = z.map(|x| self.activator.function(x));
        (z, a)
    }

    /// Computes gradients for a batch.
    ///
    /// - `upstream` is ∂L/∂a for this layer (batch × size)
    /// - `pre_activation` is the `z` cached by the forward pass
    /// - `inputs` is what was fed into this layer (batch × input_size)
    /// - `propagate` requests `input_error`; the first layer has no use for it
    ///
    /// The bias gradient is always the batch mean of δ. The weight gradient is
    /// `inputsᵀ · δ`, divided by the batch size only under `GradientAveraging::Mean`.
    pub fn compute_gradients(
        &self,
        upstream: &Matrix,
        pre_activation: &Matrix,
        inputs: &Matrix,
        averaging: GradientAveraging,
        propagate: bool,
    ) -> LayerGradients {
        let act_derivative = pre_activation.map(|x| self.activator.derivative(x));
        // δ = error ⊙ f'(z)
        let delta = upstream.hadamard(&act_derivative);

        let summed = &inputs.transpose() * &delta;
        let weights = match averaging {
            GradientAveraging::Mean => summed.scale(1.0 / delta.rows as f64),
            GradientAveraging::Sum => summed,
        };
        let biases = delta.column_mean();
        let input_error = propagate.then(|| &delta * &self.weights.transpose());

        LayerGradients {
            weights,
            biases,
            input_error,
        }
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, grads: &LayerGradients, lr: f64) {
        self.weights = &self.weights - &grads.weights.scale(lr);
        self.biases = &self.biases - &grads.biases.scale(lr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::random::seeded;

    fn fixed_layer(activation: ActivationFunction) -> Layer {
        Layer {
            weights: Matrix::from_data(vec![vec![1.0, -1.0]]),
            biases: Matrix::from_data(vec![vec![0.5, 0.0]]),
            activator: activation,
            dropout: 0.0,
        }
    }

    #[test]
    fn new_layer_has_zero_bias_and_fan_in_rows() {
        let mut rng = seeded(1);
        let layer = Layer::new(8, 3, ActivationFunction::leaky_relu(), InitScheme::He, 0.0, &mut rng);
        assert_eq!(layer.weights.shape(), (3, 8));
        assert_eq!(layer.biases.shape(), (1, 8));
        assert!(layer.biases.values().all(|b| b == 0.0));
    }

    #[test]
    fn feed_from_caches_pre_activation() {
        let layer = fixed_layer(ActivationFunction::LeakyReLU { alpha: 0.1 });
        let (z, a) = layer.feed_from(&Matrix::column(&[2.0]));
        assert_eq!(z.data, vec![vec![2.5, -2.0]]);
        assert!((a.data[0][1] + 0.2).abs() < 1e-12);
    }

    #[test]
    fn averaging_divides_weight_gradient_by_batch_size() {
        let layer = fixed_layer(ActivationFunction::Identity);
        let inputs = Matrix::column(&[1.0, 3.0]);
        let (z, _) = layer.feed_from(&inputs);
        let upstream = Matrix::from_data(vec![vec![1.0, 1.0], vec![1.0, 1.0]]);

        let mean = layer.compute_gradients(&upstream, &z, &inputs, GradientAveraging::Mean, false);
        let sum = layer.compute_gradients(&upstream, &z, &inputs, GradientAveraging::Sum, false);

        assert_eq!(sum.weights.data, vec![vec![4.0, 4.0]]);
        assert_eq!(mean.weights.data, vec![vec![2.0, 2.0]]);
        // Bias gradients are batch means under both conventions.
        assert_eq!(mean.biases, sum.biases);
        assert_eq!(sum.biases.data, vec![vec![1.0, 1.0]]);
    }

    #[test]
    fn input_error_only_when_requested() {
        let layer = fixed_layer(ActivationFunction::Identity);
        let inputs = Matrix::column(&[1.0, 3.0]);
        let (z, _) = layer.feed_from(&inputs);
        let upstream = Matrix::from_data(vec![vec![1.0, 2.0], vec![0.5, 0.0]]);

        let first = layer.compute_gradients(&upstream, &z, &inputs, GradientAveraging::Sum, false);
        assert!(first.input_error.is_none());

        let inner = layer.compute_gradients(&upstream, &z, &inputs, GradientAveraging::Sum, true);
        // δ · Wᵀ with W = [1, -1]
        assert_eq!(inner.input_error.unwrap().data, vec![vec![-1.0], vec![0.5]]);
    }
}
