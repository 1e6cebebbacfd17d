//! Sliding-window dataset construction and train/test splitting.

use timecast_spi::WindowSet;

/// Converts a dense bucketed dataset into overlapping fixed-length
/// input/target windows.
///
/// It is assumed that a value for a given bucket can be predicted from the
/// preceding ones; the number of preceding buckets used as context is the
/// `span`.
#[derive(Debug, Clone, Copy)]
pub struct WindowDatasetBuilder {
    span: usize,
}

impl WindowDatasetBuilder {
    /// Create a builder with the given window span.
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    /// Format the dataset into window samples.
    ///
    /// For each start position `i`, the window is `dataset[i..i+span]` and
    /// the target is `dataset[i+span]`. Any pair touching a missing value
    /// is skipped. The recorded index is the absolute position of the
    /// target row, needed later to scatter sparse predictions back onto the
    /// full timestamp axis. Produces zero samples when
    /// `dataset.len() <= span`.
    pub fn format(&self, dataset: &[Vec<f64>]) -> WindowSet {
        let mut set = WindowSet::default();

        if dataset.len() <= self.span {
            return set;
        }

        for i in 0..dataset.len() - self.span {
            let j = i + self.span;
            let part_x = &dataset[i..j];
            let part_y = &dataset[j];

            let has_nan = part_x.iter().flatten().any(|v| v.is_nan())
                || part_y.iter().any(|v| v.is_nan());
            if has_nan {
                continue;
            }

            set.indexes.push(j);
            set.x.push(part_x.to_vec());
            set.y.push(part_y.clone());
        }

        set
    }
}

/// Partitions a dense dataset into train/test ranges before windowing.
#[derive(Debug, Clone, Copy)]
pub struct SplitBuilder {
    span: usize,
}

impl SplitBuilder {
    /// Create a splitter with the given window span.
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    /// Split at `round(len * train_size)` and window each half
    /// independently.
    ///
    /// Windows never straddle the split boundary: the `span` rows right
    /// before the boundary are unusable as test-set context.
    pub fn split(&self, dataset: &[Vec<f64>], train_size: f64) -> (WindowSet, WindowSet) {
        let ntrn = (dataset.len() as f64 * train_size).round() as usize;
        let ntrn = ntrn.min(dataset.len());
        let builder = WindowDatasetBuilder::new(self.span);
        (
            builder.format(&dataset[..ntrn]),
            builder.format(&dataset[ntrn..]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn test_format_dense_no_missing() {
        let dataset = rows(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let set = WindowDatasetBuilder::new(3).format(&dataset);

        // n - s samples with indexes [s, s+1, ..., n-1]
        assert_eq!(set.len(), 3);
        assert_eq!(set.indexes, vec![3, 4, 5]);
        assert_eq!(set.x[0], vec![vec![0.0], vec![1.0], vec![2.0]]);
        assert_eq!(set.y[0], vec![3.0]);
        assert_eq!(set.y[2], vec![5.0]);
    }

    #[test]
    fn test_format_skips_windows_touching_nan() {
        let dataset = rows(&[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0]);
        let set = WindowDatasetBuilder::new(2).format(&dataset);

        // The NaN at position 2 poisons every window whose X or y covers
        // it: j=2 (y is NaN), j=3 and j=4 (X contains it). Only j=5
        // survives.
        assert_eq!(set.indexes, vec![5]);
        assert_eq!(set.x[0], vec![vec![4.0], vec![5.0]]);
        assert_eq!(set.y[0], vec![6.0]);
    }

    #[test]
    fn test_format_nan_excludes_all_reachable_windows() {
        let dataset = rows(&[1.0, 2.0, f64::NAN, 4.0, 5.0]);
        let set = WindowDatasetBuilder::new(2).format(&dataset);
        // Every candidate window covers position 2 in X or y.
        assert!(set.is_empty());
    }

    #[test]
    fn test_format_too_short_produces_zero_samples() {
        let dataset = rows(&[1.0, 2.0, 3.0]);
        let set = WindowDatasetBuilder::new(3).format(&dataset);
        assert!(set.is_empty());

        let set = WindowDatasetBuilder::new(5).format(&dataset);
        assert!(set.is_empty());
    }

    #[test]
    fn test_format_multi_feature_nan_in_any_column_skips() {
        let dataset = vec![
            vec![1.0, 1.0],
            vec![2.0, f64::NAN],
            vec![3.0, 3.0],
            vec![4.0, 4.0],
            vec![5.0, 5.0],
        ];
        let set = WindowDatasetBuilder::new(2).format(&dataset);
        assert_eq!(set.indexes, vec![4]);
    }

    #[test]
    fn test_split_windows_halves_independently() {
        let dataset = rows(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let (train, test) = SplitBuilder::new(2).split(&dataset, 0.6);

        // ntrn = 6: train windows over [0..6], test windows over [6..10].
        assert_eq!(train.indexes, vec![2, 3, 4, 5]);
        assert_eq!(test.indexes, vec![2, 3]);
        // Test indexes are relative to the test half; no window sees rows
        // from before the boundary.
        assert_eq!(test.x[0], vec![vec![6.0], vec![7.0]]);
        assert_eq!(test.y[0], vec![8.0]);
    }

    #[test]
    fn test_split_boundary_never_straddled() {
        let dataset = rows(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let (train, test) = SplitBuilder::new(3).split(&dataset, 0.5);

        // Each half has exactly span rows: no full window fits either side.
        assert!(train.is_empty());
        assert!(test.is_empty());
    }
}
