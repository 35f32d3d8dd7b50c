pub mod backward;
pub mod forward;
pub mod network;
pub mod spec;

pub use backward::{backpropagate, Gradients};
pub use forward::ForwardPass;
pub use network::Network;
pub use spec::{InitScheme, LayerSpec, NetworkSpec};
