use crate::network::backward::Gradients;
use crate::network::network::Network;

/// Plain gradient descent: `p ← p − lr · g`, no momentum, decay or clipping.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to every weight matrix and bias vector.
    pub fn step(&self, network: &mut Network, gradients: &Gradients) {
        assert_eq!(network.layers.len(), gradients.layers.len());
        for (layer, grads) in network.layers.iter_mut().zip(&gradients.layers) {
            layer.apply_gradients(grads, self.learning_rate);
        }
    }
}
