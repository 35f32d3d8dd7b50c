use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Transform applied to raw targets before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTransform {
    #[default]
    None,
    /// `log(1 + y)`, inverted with `exp(y) - 1`.
    Log1p,
}

impl TargetTransform {
    pub fn apply(&self, y: f64) -> f64 {
        match self {
            TargetTransform::None => y,
            TargetTransform::Log1p => y.ln_1p(),
        }
    }

    pub fn invert(&self, y: f64) -> f64 {
        match self {
            TargetTransform::None => y,
            TargetTransform::Log1p => y.exp_m1(),
        }
    }
}

/// Feature rows paired with scalar targets. Row `i` of `features` belongs to
/// `targets[i]`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Matrix,
    /// Targets after `target_transform` has been applied.
    pub targets: Vec<f64>,
    pub target_transform: TargetTransform,
}

impl Dataset {
    pub fn new(features: Matrix, targets: Vec<f64>) -> Result<Dataset> {
        if features.rows != targets.len() {
            return Err(Error::LengthMismatch {
                features: features.rows,
                targets: targets.len(),
            });
        }
        if targets.is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(Dataset {
            features,
            targets,
            target_transform: TargetTransform::None,
        })
    }

    /// Marks the targets as already transformed by `transform`.
    pub fn with_target_transform(mut self, transform: TargetTransform) -> Dataset {
        self.target_transform = transform;
        self
    }

    /// `n` evenly spaced points on `[lo, hi]` with `y = 3x + 0.7x²`.
    pub fn quadratic_curve(n: usize, lo: f64, hi: f64) -> Result<Dataset> {
        let xs = linspace(lo, hi, n);
        let ys = xs.iter().map(|&x| quadratic(x)).collect();
        Dataset::new(Matrix::column(&xs), ys)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.cols
    }

    /// Reorders rows of features and targets by the same index list.
    pub fn permuted(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select_rows(indices),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
            target_transform: self.target_transform,
        }
    }

    /// One joint random permutation of the rows.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Dataset {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);
        self.permuted(&indices)
    }

    /// Targets in original units (transform undone).
    pub fn original_targets(&self) -> Vec<f64> {
        self.targets
            .iter()
            .map(|&y| self.target_transform.invert(y))
            .collect()
    }
}

/// The synthetic curve the shallow network is fit to.
pub fn quadratic(x: f64) -> f64 {
    3.0 * x + 0.7 * x * x
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}
