use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};

/// Weight initialization scheme, applied to every layer of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitScheme {
    /// N(0, sqrt(2 / fan_in)); pairs with LeakyReLU hidden layers.
    He,
    /// N(0, sqrt(1 / fan_in)).
    Xavier,
}

/// Describes one hidden layer.
///
/// Fields:
/// - `size`       — number of units
/// - `activation` — activation applied after the linear transform
/// - `dropout`    — inverted-dropout rate on this layer's output while training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub activation: ActivationFunction,
    #[serde(default)]
    pub dropout: f64,
}

/// Architecture of a scalar regression network.
///
/// The output layer is implicit: a single Identity unit after the last
/// hidden layer, so every forward pass yields a `(batch × 1)` prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Width of the feature rows the network consumes.
    pub input_size: usize,
    /// Hidden layers, input side first.
    pub hidden: Vec<LayerSpec>,
    pub init: InitScheme,
}

impl NetworkSpec {
    /// One ReLU hidden layer, Xavier init, no dropout.
    pub fn shallow(input_size: usize, hidden_size: usize) -> NetworkSpec {
        NetworkSpec {
            input_size,
            hidden: vec![LayerSpec {
                size: hidden_size,
                activation: ActivationFunction::relu(),
                dropout: 0.0,
            }],
            init: InitScheme::Xavier,
        }
    }

    /// LeakyReLU hidden layers with He init; dropout gates the first hidden
    /// layer only.
    pub fn deep(input_size: usize, hidden_sizes: &[usize], dropout: f64) -> NetworkSpec {
        let hidden = hidden_sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| LayerSpec {
                size,
                activation: ActivationFunction::leaky_relu(),
                dropout: if i == 0 { dropout } else { 0.0 },
            })
            .collect();
        NetworkSpec {
            input_size,
            hidden,
            init: InitScheme::He,
        }
    }

    /// `(size, input_size, activation, dropout)` for every layer including
    /// the output unit.
    pub fn layer_shapes(&self) -> Vec<(usize, usize, ActivationFunction, f64)> {
        let mut shapes = Vec::with_capacity(self.hidden.len() + 1);
        let mut fan_in = self.input_size;
        for layer in &self.hidden {
            shapes.push((layer.size, fan_in, layer.activation, layer.dropout));
            fan_in = layer.size;
        }
        shapes.push((1, fan_in, ActivationFunction::Identity, 0.0));
        shapes
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(Error::InvalidConfig("input size must be at least 1".into()));
        }
        for (i, layer) in self.hidden.iter().enumerate() {
            if layer.size == 0 {
                return Err(Error::InvalidConfig(format!("hidden layer {i} has zero width")));
            }
            if !(0.0..1.0).contains(&layer.dropout) {
                return Err(Error::InvalidConfig(format!(
                    "hidden layer {i}: dropout {} is outside [0, 1)",
                    layer.dropout
                )));
            }
        }
        Ok(())
    }
}
