use serde::{Deserialize, Serialize};

/// Per-epoch training statistics produced by `Trainer::run_epoch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean of the per-batch MSEs, on normalized targets. `None` when the
    /// epoch had no full batch to process.
    pub train_loss: Option<f64>,
    /// Batches processed this epoch.
    pub batches: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
