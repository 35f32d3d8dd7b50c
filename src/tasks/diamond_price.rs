use std::path::Path;

use rand::seq::index::sample;
use tracing::info;

use crate::config::DiamondConfig;
use crate::data::dataset::Dataset;
use crate::data::features::FeatureEngineer;
use crate::error::Result;
use crate::math::random::seeded;
use crate::train::trainer::{Trainer, TrainingOutcome};

/// One reported row: actual vs predicted price in dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    pub row: usize,
    pub actual: f64,
    pub predicted: f64,
}

pub struct DiamondReport {
    pub outcome: TrainingOutcome,
    pub samples: Vec<PriceSample>,
    /// Mean absolute error over the whole engineered set, in dollars.
    pub mean_absolute_error: f64,
}

/// Loads and engineers the CSV at `path`, then trains.
pub fn run<P: AsRef<Path>>(path: P, config: &DiamondConfig) -> Result<DiamondReport> {
    config.validate()?;
    let mut rng = seeded(config.seed);

    let engineer = FeatureEngineer::new(config.schema.clone());
    let data = engineer.load_path(path.as_ref(), &mut rng)?;
    info!(
        path = %path.as_ref().display(),
        rows = data.len(),
        features = data.n_features(),
        "loaded diamond data"
    );

    train_on(&data, config, &mut rng)
}

/// Trains on an already engineered dataset; `rng` continues the stream
/// used for engineering.
pub fn train_on<R: rand::RngCore>(data: &Dataset, config: &DiamondConfig, rng: &mut R) -> Result<DiamondReport> {
    let spec = config.network_spec(data.n_features());
    let trainer = Trainer::new(&spec, config.train_config(), data, rng)?;
    let outcome = trainer.fit(rng);

    let predictions = outcome.model.predict(&data.features)?;
    let actual = data.original_targets();

    let picks = sample(rng, data.len(), config.sample_predictions.min(data.len()));
    let samples = picks
        .into_iter()
        .map(|row| PriceSample {
            row,
            actual: actual[row],
            predicted: predictions[row],
        })
        .collect();

    let mean_absolute_error = outcome.model.mean_absolute_error(data)?;

    Ok(DiamondReport {
        outcome,
        samples,
        mean_absolute_error,
    })
}
