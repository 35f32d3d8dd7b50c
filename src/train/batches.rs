use std::ops::Range;

/// Contiguous `[start, end)` ranges of exactly `batch_size` samples.
///
/// Yields `n_samples / batch_size` ranges; the remainder is not covered.
pub fn batch_ranges(n_samples: usize, batch_size: usize) -> impl Iterator<Item = Range<usize>> {
    let count = if batch_size == 0 { 0 } else { n_samples / batch_size };
    (0..count).map(move |b| b * batch_size..(b + 1) * batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_is_dropped() {
        let ranges: Vec<_> = batch_ranges(10, 3).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..9]);
    }

    #[test]
    fn count_is_floor_of_ratio() {
        for (n, b) in [(0, 4), (3, 4), (4, 4), (1023, 1024), (5000, 1024), (7, 1)] {
            assert_eq!(batch_ranges(n, b).count(), n / b);
            assert!(batch_ranges(n, b).all(|r| r.end <= n && r.len() == b));
        }
    }
}
