use crate::data::dataset::{Dataset, TargetTransform};
use crate::data::normalize::NormalizationStats;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Final parameters bundled with the normalization stats and target
/// transform they were trained under. The stats travel with the model and
/// are never re-fit on inference data.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    network: Network,
    stats: NormalizationStats,
    target_transform: TargetTransform,
}

impl TrainedModel {
    pub(crate) fn new(network: Network, stats: NormalizationStats, target_transform: TargetTransform) -> Self {
        TrainedModel {
            network,
            stats,
            target_transform,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }

    pub fn target_transform(&self) -> TargetTransform {
        self.target_transform
    }

    /// Predictions in original target units, one per row of `features`.
    ///
    /// `features` must have the training-time column layout; a different
    /// width is an `Error::ShapeMismatch`.
    pub fn predict(&self, features: &Matrix) -> Result<Vec<f64>> {
        let normalized = self.stats.normalize_features(features)?;
        let pass = self.network.infer(&normalized);
        Ok(pass
            .predictions()
            .into_iter()
            .map(|y| self.target_transform.invert(self.stats.denormalize_target(y)))
            .collect())
    }

    pub fn predict_one(&self, row: &[f64]) -> Result<f64> {
        let preds = self.predict(&Matrix::from_data(vec![row.to_vec()]))?;
        preds.into_iter().next().ok_or(Error::EmptyDataset)
    }

    /// Mean absolute error against `dataset`'s targets, in original units.
    pub fn mean_absolute_error(&self, dataset: &Dataset) -> Result<f64> {
        let preds = self.predict(&dataset.features)?;
        let actual = dataset.original_targets();
        Ok(preds.iter().zip(&actual).map(|(p, y)| (p - y).abs()).sum::<f64>() / actual.len() as f64)
    }
}
