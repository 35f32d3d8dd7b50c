use rand::Rng;

use crate::math::matrix::Matrix;

/// Samples an inverted-dropout mask: each entry is `0` with probability
/// `rate`, otherwise `1 / (1 - rate)`.
pub fn sample_mask<R: Rng + ?Sized>(rows: usize, cols: usize, rate: f64, rng: &mut R) -> Matrix {
    let keep_scale = 1.0 / (1.0 - rate);
    let mut mask = Matrix::zeros(rows, cols);
    for row in mask.data.iter_mut() {
        for m in row.iter_mut() {
            if rng.gen::<f64>() > rate {
                *m = keep_scale;
            }
        }
    }
    mask
}

/// Gates `activation` with a freshly sampled mask. A zero rate is the
/// identity and draws nothing from `rng`.
pub fn apply<R: Rng + ?Sized>(activation: Matrix, rate: f64, rng: &mut R) -> Matrix {
    if rate <= 0.0 {
        return activation;
    }
    let mask = sample_mask(activation.rows, activation.cols, rate, rng);
    activation.hadamard(&mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::random::seeded;

    #[test]
    fn zero_rate_is_identity() {
        let mut rng = seeded(3);
        let a = Matrix::from_data(vec![vec![1.0, -2.0], vec![0.5, 4.0]]);
        assert_eq!(apply(a.clone(), 0.0, &mut rng), a);
    }

    #[test]
    fn survivors_are_rescaled() {
        let mut rng = seeded(3);
        let mask = sample_mask(50, 40, 0.25, &mut rng);
        for v in mask.values() {
            assert!(v == 0.0 || (v - 1.0 / 0.75).abs() < 1e-12);
        }
        // Expected activation magnitude is preserved.
        let mean = mask.values().sum::<f64>() / 2000.0;
        assert!((mean - 1.0).abs() < 0.08, "mask mean was {mean}");
    }
}
