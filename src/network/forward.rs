use crate::math::matrix::Matrix;

/// Everything a forward pass leaves behind for backpropagation.
///
/// Index `i` refers to layer `i`:
/// - `inputs[i]`          — the matrix fed into layer `i` (the raw batch for
///                          `i = 0`, otherwise layer `i - 1`'s activation after
///                          any dropout mask)
/// - `pre_activations[i]` — `z = x · W + b` for layer `i`
#[derive(Debug, Clone)]
pub struct ForwardPass {
    pub inputs: Vec<Matrix>,
    pub pre_activations: Vec<Matrix>,
    /// Final prediction, `(batch × 1)`.
    pub output: Matrix,
}

impl ForwardPass {
    /// Predictions as a flat vector, one per row.
    pub fn predictions(&self) -> Vec<f64> {
        self.output.column_values(0)
    }
}
