use serde::{Deserialize, Serialize};

use crate::data::normalize::FeatureScaling;
use crate::error::{Error, Result};

/// Where the batch average is taken for weight gradients.
///
/// Bias gradients are always batch means. The two conventions differ in
/// effective learning rate by a factor of the batch size, so each network
/// variant keeps its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientAveraging {
    /// `Xᵀδ / batch_size`.
    Mean,
    /// Raw `Xᵀδ`, scaled only by the learning rate.
    Sum,
}

/// Configuration for a `Trainer` run.
///
/// # Fields
/// - `epochs`        — exact number of passes; there is no early stopping
/// - `batch_size`    — samples per mini-batch; `None` trains on the full set
///                     every step. Samples past the last full batch are
///                     dropped for that epoch.
/// - `learning_rate` — plain gradient-descent step size
/// - `averaging`     — weight-gradient batch convention
/// - `scaling`       — how feature normalization statistics are pooled
/// - `log_every`     — emit an `info` event every this many epochs (0 = never)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: Option<usize>,
    pub learning_rate: f64,
    pub averaging: GradientAveraging,
    pub scaling: FeatureScaling,
    pub log_every: usize,
}

impl TrainConfig {
    /// Full-batch training with explicitly averaged gradients and global
    /// feature scaling.
    pub fn full_batch(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size: None,
            learning_rate,
            averaging: GradientAveraging::Mean,
            scaling: FeatureScaling::Global,
            log_every: 500,
        }
    }

    /// Mini-batch training with summed weight gradients and per-column
    /// feature scaling.
    pub fn mini_batch(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size: Some(batch_size),
            learning_rate,
            averaging: GradientAveraging::Sum,
            scaling: FeatureScaling::PerColumn,
            log_every: 10,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.batch_size == Some(0) {
            return Err(Error::InvalidConfig("batch size must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}
