use serde::{Deserialize, Serialize};

/// Default negative-side slope for LeakyReLU hidden layers.
pub const LEAKY_RELU_ALPHA: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivationFunction {
    /// `x` for positive inputs, `alpha * x` otherwise. `alpha = 0` is a hard ReLU.
    LeakyReLU { alpha: f64 },
    /// Unbounded regression output.
    Identity,
}

impl ActivationFunction {
    pub fn leaky_relu() -> Self {
        ActivationFunction::LeakyReLU { alpha: LEAKY_RELU_ALPHA }
    }

    pub fn relu() -> Self {
        ActivationFunction::LeakyReLU { alpha: 0.0 }
    }

    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Identity => x,
        }
    }

    /// Element-wise derivative, evaluated on the pre-activation value.
    /// At exactly zero LeakyReLU reports `alpha`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { 1.0 } else { *alpha },
            ActivationFunction::Identity => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaky_relu_passes_positive_and_scales_negative() {
        let f = ActivationFunction::leaky_relu();
        assert_eq!(f.function(3.0), 3.0);
        assert!((f.function(-2.0) + 0.02).abs() < 1e-12);
    }

    #[test]
    fn leaky_relu_derivative_is_one_or_alpha() {
        let f = ActivationFunction::LeakyReLU { alpha: 0.2 };
        for x in [1e-9, 0.5, 7.0, 1e6] {
            assert_eq!(f.derivative(x), 1.0);
        }
        for x in [-1e-9, -0.5, -7.0, -1e6] {
            assert_eq!(f.derivative(x), 0.2);
        }
        assert_eq!(f.derivative(0.0), 0.2);
    }

    #[test]
    fn relu_is_leaky_relu_with_zero_slope() {
        let f = ActivationFunction::relu();
        assert_eq!(f.function(-4.0), 0.0);
        assert_eq!(f.derivative(-4.0), 0.0);
    }

    #[test]
    fn identity_has_unit_derivative() {
        let f = ActivationFunction::Identity;
        assert_eq!(f.function(-12.5), -12.5);
        assert_eq!(f.derivative(-12.5), 1.0);
    }
}
