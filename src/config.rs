//! Run configuration for the two network instances.
//!
//! Both configs deserialize from JSON with every field optional; missing
//! fields take the defaults below.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::data::features::TabularSchema;
use crate::error::{Error, Result};
use crate::network::spec::NetworkSpec;
use crate::train::train_config::TrainConfig;

/// Shallow network fit to `y = 3x + 0.7x²`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveFitConfig {
    pub hidden_size: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    /// Evenly spaced training points on `[x_min, x_max]`.
    pub samples: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub seed: u64,
    pub log_every: usize,
}

impl Default for CurveFitConfig {
    fn default() -> Self {
        CurveFitConfig {
            hidden_size: 64,
            learning_rate: 0.001,
            epochs: 10_000,
            samples: 200,
            x_min: -10.0,
            x_max: 10.0,
            seed: 42,
            log_every: 500,
        }
    }
}

impl CurveFitConfig {
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<CurveFitConfig> {
        load_json(path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(Error::InvalidConfig("samples must be at least 1".into()));
        }
        if !(self.x_min < self.x_max) {
            return Err(Error::InvalidConfig(format!(
                "x range [{}, {}] is empty",
                self.x_min, self.x_max
            )));
        }
        self.network_spec().validate()?;
        self.train_config().validate()
    }

    pub fn network_spec(&self) -> NetworkSpec {
        NetworkSpec::shallow(1, self.hidden_size)
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig {
            log_every: self.log_every,
            ..TrainConfig::full_batch(self.epochs, self.learning_rate)
        }
    }
}

/// Deep network with dropout fit to the diamond-pricing CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiamondConfig {
    pub hidden_sizes: Vec<usize>,
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
    /// Applied to the first hidden layer only.
    pub dropout_rate: f64,
    pub seed: u64,
    pub log_every: usize,
    /// Number of random rows to report predictions for after training.
    pub sample_predictions: usize,
    pub schema: TabularSchema,
}

impl Default for DiamondConfig {
    fn default() -> Self {
        DiamondConfig {
            hidden_sizes: vec![128, 64, 32],
            learning_rate: 1e-4,
            epochs: 150,
            batch_size: 1024,
            dropout_rate: 0.2,
            seed: 42,
            log_every: 10,
            sample_predictions: 5,
            schema: TabularSchema::default(),
        }
    }
}

impl DiamondConfig {
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<DiamondConfig> {
        load_json(path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hidden_sizes.is_empty() {
            return Err(Error::InvalidConfig("at least one hidden layer is required".into()));
        }
        // Input width is only known after feature engineering; any positive
        // value checks the hidden layers.
        self.network_spec(1).validate()?;
        self.train_config().validate()
    }

    pub fn network_spec(&self, input_size: usize) -> NetworkSpec {
        NetworkSpec::deep(input_size, &self.hidden_sizes, self.dropout_rate)
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig {
            log_every: self.log_every,
            ..TrainConfig::mini_batch(self.epochs, self.batch_size, self.learning_rate)
        }
    }
}

fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
