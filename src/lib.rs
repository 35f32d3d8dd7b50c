pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;
pub mod model;
pub mod tasks;
pub mod config;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use math::random::seeded;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::spec::{InitScheme, LayerSpec, NetworkSpec};
pub use loss::mse::MseLoss;
pub use optim::sgd::Sgd;
pub use data::dataset::{Dataset, TargetTransform};
pub use data::features::{FeatureEngineer, TabularSchema};
pub use data::normalize::{FeatureScaling, NormalizationStats};
pub use train::trainer::{Trainer, TrainingOutcome};
pub use train::train_config::{GradientAveraging, TrainConfig};
pub use train::history::LossHistory;
pub use model::predictor::TrainedModel;
pub use config::{CurveFitConfig, DiamondConfig};
pub use error::{Error, Result};
