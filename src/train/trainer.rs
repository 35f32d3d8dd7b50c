use std::time::Instant;

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::data::dataset::{Dataset, TargetTransform};
use crate::data::normalize::NormalizationStats;
use crate::error::{Error, Result};
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::model::predictor::TrainedModel;
use crate::network::backward::backpropagate;
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;
use crate::optim::sgd::Sgd;
use crate::train::batches::batch_ranges;
use crate::train::epoch_stats::EpochStats;
use crate::train::history::LossHistory;
use crate::train::train_config::TrainConfig;

/// Owns the network for the duration of a run and drives mini-batch
/// gradient descent over a normalized copy of the training set.
///
/// Construction initializes parameters and normalization stats; each
/// `run_epoch` call then shuffles, batches, and updates. Once `epochs`
/// epochs have run the trainer is done and further calls return `None`.
///
/// The random stream is passed into every call that draws from it, so the
/// caller keeps one seeded stream for the whole run.
pub struct Trainer {
    network: Network,
    optimizer: Sgd,
    config: TrainConfig,
    stats: NormalizationStats,
    target_transform: TargetTransform,
    features: Matrix,
    targets: Matrix,
    history: LossHistory,
    epoch: usize,
}

/// What a finished run hands back.
pub struct TrainingOutcome {
    pub model: TrainedModel,
    pub history: LossHistory,
}

impl Trainer {
    /// Fits normalization stats on `dataset`, then initializes the network
    /// from `rng`.
    pub fn new<R: RngCore>(
        spec: &NetworkSpec,
        config: TrainConfig,
        dataset: &Dataset,
        rng: &mut R,
    ) -> Result<Trainer> {
        spec.validate()?;
        config.validate()?;
        if spec.input_size != dataset.n_features() {
            return Err(Error::ShapeMismatch {
                context: "network input",
                expected: spec.input_size,
                got: dataset.n_features(),
            });
        }

        let stats = NormalizationStats::fit(dataset, config.scaling);
        let features = stats.normalize_features(&dataset.features)?;
        let targets = stats.normalize_targets(&dataset.targets);
        let network = Network::new(spec, rng);

        info!(
            samples = dataset.len(),
            features = dataset.n_features(),
            layers = network.layers.len(),
            epochs = config.epochs,
            "Starting training..."
        );

        Ok(Trainer {
            network,
            optimizer: Sgd::new(config.learning_rate),
            stats,
            target_transform: dataset.target_transform,
            features,
            targets,
            history: LossHistory::default(),
            epoch: 0,
            config,
        })
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn is_done(&self) -> bool {
        self.epoch >= self.config.epochs
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }

    pub fn history(&self) -> &LossHistory {
        &self.history
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size.unwrap_or(self.features.rows)
    }

    pub fn batches_per_epoch(&self) -> usize {
        batch_ranges(self.features.rows, self.batch_size()).count()
    }

    /// Runs one epoch. Returns `None` once the configured epoch count has
    /// been reached.
    pub fn run_epoch<R: RngCore>(&mut self, rng: &mut R) -> Option<EpochStats> {
        if self.is_done() {
            return None;
        }
        self.epoch += 1;
        let t_start = Instant::now();

        let mut indices: Vec<usize> = (0..self.features.rows).collect();
        indices.shuffle(rng);

        let mut loss_sum = 0.0;
        let mut batches = 0;
        for range in batch_ranges(indices.len(), self.batch_size()) {
            let batch = &indices[range];
            let x = self.features.select_rows(batch);
            let y = self.targets.select_rows(batch);

            let pass = self.network.forward(&x, rng);
            loss_sum += MseLoss::loss(&pass.output, &y);

            let grads = backpropagate(&self.network, &pass, &y, self.config.averaging);
            self.optimizer.step(&mut self.network, &grads);
            batches += 1;
        }

        let train_loss = if batches == 0 {
            warn!(
                epoch = self.epoch,
                samples = indices.len(),
                batch_size = self.batch_size(),
                "no full batch this epoch; nothing recorded"
            );
            None
        } else {
            let loss = loss_sum / batches as f64;
            self.history.push(loss);
            Some(loss)
        };

        let stats = EpochStats {
            epoch: self.epoch,
            total_epochs: self.config.epochs,
            train_loss,
            batches,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(?stats, "epoch complete");
        if let Some(loss) = train_loss {
            let every = self.config.log_every;
            if every > 0 && (self.epoch - 1) % every == 0 {
                info!("Epoch {}: Loss = {:.6}", self.epoch - 1, loss);
            }
        }

        Some(stats)
    }

    /// Runs every remaining epoch and hands back the trained model.
    pub fn fit<R: RngCore>(mut self, rng: &mut R) -> TrainingOutcome {
        while self.run_epoch(rng).is_some() {}

        info!(
            epochs = self.epoch,
            final_loss = ?self.history.last(),
            "training finished"
        );

        TrainingOutcome {
            model: TrainedModel::new(self.network, self.stats, self.target_transform),
            history: self.history,
        }
    }
}
