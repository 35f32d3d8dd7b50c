use rand::{Rng, RngCore};

use crate::layers::dense::Layer;
use crate::layers::dropout;
use crate::math::matrix::Matrix;
use crate::network::forward::ForwardPass;
use crate::network::spec::NetworkSpec;

/// The network parameters: an ordered stack of dense layers. Depth and
/// widths are fixed at construction; training only mutates weights/biases.
#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds and randomly initializes a network from its spec.
    pub fn new<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Network {
        let layers = spec
            .layer_shapes()
            .into_iter()
            .map(|(size, input_size, activation, rate)| {
                Layer::new(size, input_size, activation, spec.init, rate, rng)
            })
            .collect();
        Network { layers }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    /// Training-mode forward pass; dropout-eligible layers are gated by a
    /// fresh mask drawn from `rng`.
    pub fn forward<R: RngCore>(&self, input: &Matrix, rng: &mut R) -> ForwardPass {
        self.evaluate(input, Some(rng as &mut dyn RngCore))
    }

    /// Inference-mode forward pass; dropout is a no-op.
    pub fn infer(&self, input: &Matrix) -> ForwardPass {
        self.evaluate(input, None)
    }

    fn evaluate(&self, input: &Matrix, mut rng: Option<&mut dyn RngCore>) -> ForwardPass {
        assert_eq!(
            input.cols,
            self.input_size(),
            "Network expects {} input columns",
            self.input_size()
        );

        let mut inputs = Vec::with_capacity(self.layers.len());
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let mut current = input.clone();

        for layer in &self.layers {
            let (z, mut a) = layer.feed_from(&current);
            if let Some(rng) = rng.as_deref_mut() {
                a = dropout::apply(a, layer.dropout, rng);
            }
            inputs.push(current);
            pre_activations.push(z);
            current = a;
        }

        ForwardPass {
            inputs,
            pre_activations,
            output: current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::random::seeded;

    #[test]
    fn output_is_one_column_for_any_widths() {
        let mut rng = seeded(11);
        for hidden in [vec![1], vec![5, 3], vec![17, 9, 4]] {
            let spec = NetworkSpec::deep(6, &hidden, 0.3);
            let net = Network::new(&spec, &mut rng);
            let x = Matrix::zeros(13, 6);
            assert_eq!(net.forward(&x, &mut rng).output.shape(), (13, 1));
            assert_eq!(net.infer(&x).output.shape(), (13, 1));
        }
    }

    #[test]
    fn zero_dropout_training_matches_inference() {
        let mut rng = seeded(5);
        let net = Network::new(&NetworkSpec::deep(3, &[8, 4], 0.0), &mut rng);
        let x = Matrix::from_data(vec![vec![0.1, -0.4, 2.0], vec![1.5, 0.0, -1.0]]);
        assert_eq!(net.forward(&x, &mut rng).output, net.infer(&x).output);
    }

    #[test]
    fn dropout_only_acts_in_training() {
        let mut rng = seeded(5);
        let net = Network::new(&NetworkSpec::deep(3, &[64, 4], 0.5), &mut rng);
        let x = Matrix::from_data(vec![vec![0.3, -0.2, 1.0]]);
        let a = net.infer(&x).output;
        let b = net.infer(&x).output;
        assert_eq!(a, b);
        assert_ne!(net.forward(&x, &mut rng).output, a);
    }

    #[test]
    #[should_panic(expected = "input columns")]
    fn wrong_width_fails_loudly() {
        let mut rng = seeded(5);
        let net = Network::new(&NetworkSpec::shallow(2, 4), &mut rng);
        net.infer(&Matrix::zeros(1, 3));
    }
}
