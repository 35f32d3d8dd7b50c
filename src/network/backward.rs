use crate::layers::dense::LayerGradients;
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::network::forward::ForwardPass;
use crate::network::network::Network;
use crate::train::train_config::GradientAveraging;

/// Per-layer gradients of the batch MSE, in layer order (input side first).
#[derive(Debug, Clone)]
pub struct Gradients {
    pub layers: Vec<LayerGradients>,
}

/// Reverse-mode chain rule through the activations cached in `pass`.
///
/// The starting error is `pred - y`. Each layer's activation derivative is
/// evaluated on its own pre-activation sum. Dropout masks are not re-applied
/// here: gradients flow through the already-masked activations recorded in
/// `pass.inputs`.
///
/// All gradients are computed against the current weights before any update.
pub fn backpropagate(
    network: &Network,
    pass: &ForwardPass,
    targets: &Matrix,
    averaging: GradientAveraging,
) -> Gradients {
    assert_eq!(
        pass.output.shape(),
        targets.shape(),
        "predictions and targets differ in shape"
    );

    let mut upstream = MseLoss::derivative(&pass.output, targets);
    let mut layers = Vec::with_capacity(network.layers.len());

    for (i, layer) in network.layers.iter().enumerate().rev() {
        let mut grads = layer.compute_gradients(
            &upstream,
            &pass.pre_activations[i],
            &pass.inputs[i],
            averaging,
            i > 0,
        );
        if let Some(error) = grads.input_error.take() {
            upstream = error;
        }
        layers.push(grads);
    }

    layers.reverse();
    Gradients { layers }
}
