use serde::Serialize;

/// Append-only per-epoch loss record. Only the trainer appends; everyone
/// else gets read access.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LossHistory {
    losses: Vec<f64>,
}

impl LossHistory {
    pub(crate) fn push(&mut self, loss: f64) {
        self.losses.push(loss);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.losses
    }

    pub fn len(&self) -> usize {
        self.losses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.losses.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.losses.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.losses.iter().copied()
    }

    /// Losses from epoch index `from` on (empty if the run was shorter).
    pub fn tail(&self, from: usize) -> &[f64] {
        self.losses.get(from..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_skips_warmup_epochs() {
        let mut h = LossHistory::default();
        for l in [5.0, 4.0, 3.0, 2.5] {
            h.push(l);
        }
        assert_eq!(h.tail(2), &[3.0, 2.5]);
        assert!(h.tail(10).is_empty());
        assert_eq!(h.first(), Some(5.0));
    }
}
