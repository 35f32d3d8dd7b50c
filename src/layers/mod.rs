pub mod dense;
pub mod dropout;

pub use dense::{Layer, LayerGradients};
