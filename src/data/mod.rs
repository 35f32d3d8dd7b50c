pub mod categorical;
pub mod dataset;
pub mod features;
pub mod normalize;

pub use categorical::{Grade, OrdinalTable};
pub use dataset::{Dataset, TargetTransform};
pub use features::{expand_features, FeatureEngineer, TabularSchema};
pub use normalize::{FeatureScaling, NormalizationStats};
