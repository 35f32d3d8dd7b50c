use serde::{Deserialize, Serialize};

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Added to every standard deviation before dividing, so constant columns
/// normalize to zero instead of NaN.
pub const STD_EPSILON: f64 = 1e-8;

/// How feature statistics are pooled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureScaling {
    /// One mean/std over every feature value.
    Global,
    /// A mean/std per feature column.
    PerColumn,
}

/// Z-score statistics for features and target, computed once from the
/// training set. Fields are private: the stats cannot change after `fit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationStats {
    scaling: FeatureScaling,
    feature_mean: Vec<f64>,
    feature_std: Vec<f64>,
    target_mean: f64,
    target_std: f64,
}

impl NormalizationStats {
    /// Population mean and standard deviation of the training data.
    pub fn fit(dataset: &Dataset, scaling: FeatureScaling) -> NormalizationStats {
        let cols = dataset.n_features();
        let (feature_mean, feature_std) = match scaling {
            FeatureScaling::Global => {
                let (m, s) = mean_std(dataset.features.values());
                (vec![m; cols], vec![s; cols])
            }
            FeatureScaling::PerColumn => (0..cols)
                .map(|j| mean_std(dataset.features.data.iter().map(|row| row[j])))
                .unzip(),
        };
        let (target_mean, target_std) = mean_std(dataset.targets.iter().copied());

        NormalizationStats {
            scaling,
            feature_mean,
            feature_std,
            target_mean,
            target_std,
        }
    }

    pub fn scaling(&self) -> FeatureScaling {
        self.scaling
    }

    pub fn n_features(&self) -> usize {
        self.feature_mean.len()
    }

    pub fn feature_mean(&self) -> &[f64] {
        &self.feature_mean
    }

    pub fn feature_std(&self) -> &[f64] {
        &self.feature_std
    }

    pub fn target_mean(&self) -> f64 {
        self.target_mean
    }

    pub fn target_std(&self) -> f64 {
        self.target_std
    }

    /// `(x - mean) / (std + ε)` per column. The width must match the data the
    /// stats were fit on.
    pub fn normalize_features(&self, features: &Matrix) -> Result<Matrix> {
        if features.cols != self.n_features() {
            return Err(Error::ShapeMismatch {
                context: "feature normalization",
                expected: self.n_features(),
                got: features.cols,
            });
        }
        let data = features
            .data
            .iter()
            .map(|row| {
                row.iter()
                    .zip(self.feature_mean.iter().zip(&self.feature_std))
                    .map(|(x, (m, s))| (x - m) / (s + STD_EPSILON))
                    .collect()
            })
            .collect();
        Ok(Matrix {
            rows: features.rows,
            cols: features.cols,
            data,
        })
    }

    pub fn normalize_target(&self, y: f64) -> f64 {
        (y - self.target_mean) / (self.target_std + STD_EPSILON)
    }

    pub fn denormalize_target(&self, y: f64) -> f64 {
        y * (self.target_std + STD_EPSILON) + self.target_mean
    }

    /// Normalized targets as a `(n × 1)` column.
    pub fn normalize_targets(&self, targets: &[f64]) -> Matrix {
        let normalized: Vec<f64> = targets.iter().map(|&y| self.normalize_target(y)).collect();
        Matrix::column(&normalized)
    }

    pub fn denormalize_targets(&self, normalized: &[f64]) -> Vec<f64> {
        normalized.iter().map(|&y| self.denormalize_target(y)).collect()
    }
}

fn mean_std(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let var = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: Vec<Vec<f64>>, targets: Vec<f64>) -> Dataset {
        Dataset::new(Matrix::from_data(rows), targets).unwrap()
    }

    #[test]
    fn per_column_stats_use_population_std() {
        let data = dataset(vec![vec![1.0, 10.0], vec![3.0, 10.0]], vec![2.0, 4.0]);
        let stats = NormalizationStats::fit(&data, FeatureScaling::PerColumn);
        assert_eq!(stats.feature_mean(), &[2.0, 10.0]);
        assert_eq!(stats.feature_std(), &[1.0, 0.0]);
        assert_eq!(stats.target_mean(), 3.0);
        assert_eq!(stats.target_std(), 1.0);
    }

    #[test]
    fn global_stats_pool_all_columns() {
        let data = dataset(vec![vec![0.0, 4.0], vec![2.0, 6.0]], vec![0.0, 0.0]);
        let stats = NormalizationStats::fit(&data, FeatureScaling::Global);
        assert_eq!(stats.feature_mean(), &[3.0, 3.0]);
        assert!((stats.feature_std()[0] - 5.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn constant_column_normalizes_to_zero() {
        let data = dataset(vec![vec![5.0, 1.0], vec![5.0, 2.0], vec![5.0, 3.0]], vec![1.0, 2.0, 3.0]);
        let stats = NormalizationStats::fit(&data, FeatureScaling::PerColumn);
        let norm = stats.normalize_features(&data.features).unwrap();
        for row in &norm.data {
            assert!(row[0].is_finite());
            assert!(row[0].abs() < 1e-12);
        }
    }

    #[test]
    fn constant_target_does_not_blow_up() {
        let data = dataset(vec![vec![1.0], vec![2.0]], vec![7.0, 7.0]);
        let stats = NormalizationStats::fit(&data, FeatureScaling::Global);
        let y = stats.normalize_targets(&data.targets);
        assert!(y.values().all(|v| v.is_finite()));
    }

    #[test]
    fn target_round_trip() {
        let targets = vec![-31.5, 0.0, 2.25, 1e4, 7.0];
        let data = dataset(targets.iter().map(|&t| vec![t]).collect(), targets.clone());
        let stats = NormalizationStats::fit(&data, FeatureScaling::Global);
        let normalized = stats.normalize_targets(&targets).column_values(0);
        let back = stats.denormalize_targets(&normalized);
        for (a, b) in back.iter().zip(&targets) {
            assert!((a - b).abs() < 1e-9 * (1.0 + b.abs()));
        }
    }

    #[test]
    fn width_mismatch_is_an_error() {
        let data = dataset(vec![vec![1.0, 2.0]], vec![1.0]);
        let stats = NormalizationStats::fit(&data, FeatureScaling::PerColumn);
        let err = stats.normalize_features(&Matrix::zeros(1, 3)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 2, got: 3, .. }));
    }

    #[test]
    fn empty_batch_keeps_its_width() {
        let data = dataset(vec![vec![1.0, 2.0], vec![3.0, 4.0]], vec![1.0, 2.0]);
        let stats = NormalizationStats::fit(&data, FeatureScaling::PerColumn);
        let norm = stats.normalize_features(&Matrix::zeros(0, 2)).unwrap();
        assert_eq!(norm.shape(), (0, 2));
    }
}
