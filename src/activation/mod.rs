pub mod activation;

pub use activation::{ActivationFunction, LEAKY_RELU_ALPHA};
