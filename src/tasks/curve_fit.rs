use tracing::info;

use crate::config::CurveFitConfig;
use crate::data::dataset::{quadratic, Dataset};
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::math::random::seeded;
use crate::train::trainer::{Trainer, TrainingOutcome};

/// Points the fitted curve is checked at after training.
pub const PROBE_POINTS: [f64; 5] = [-8.0, -4.0, 0.0, 4.0, 8.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub x: f64,
    pub actual: f64,
    pub predicted: f64,
}

pub struct CurveFitReport {
    pub outcome: TrainingOutcome,
    pub probes: Vec<Probe>,
}

/// Generates the synthetic curve, trains the shallow network on it, and
/// evaluates the probe points with the training-time normalization.
pub fn run(config: &CurveFitConfig) -> Result<CurveFitReport> {
    config.validate()?;
    let mut rng = seeded(config.seed);

    let data = Dataset::quadratic_curve(config.samples, config.x_min, config.x_max)?;
    info!(
        hidden = config.hidden_size,
        learning_rate = config.learning_rate,
        epochs = config.epochs,
        "fitting y = 3x + 0.7x^2"
    );

    let trainer = Trainer::new(&config.network_spec(), config.train_config(), &data, &mut rng)?;
    let outcome = trainer.fit(&mut rng);

    let predictions = outcome.model.predict(&Matrix::column(&PROBE_POINTS))?;
    let probes = PROBE_POINTS
        .iter()
        .zip(predictions)
        .map(|(&x, predicted)| Probe {
            x,
            actual: quadratic(x),
            predicted,
        })
        .collect();

    Ok(CurveFitReport { outcome, probes })
}
