pub mod batches;
pub mod epoch_stats;
pub mod history;
pub mod train_config;
pub mod trainer;

pub use batches::batch_ranges;
pub use epoch_stats::EpochStats;
pub use history::LossHistory;
pub use train_config::{GradientAveraging, TrainConfig};
pub use trainer::{Trainer, TrainingOutcome};
