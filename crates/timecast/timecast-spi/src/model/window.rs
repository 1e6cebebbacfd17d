//! Sliding-window sample types.

use serde::{Deserialize, Serialize};

/// One input window: `span` consecutive feature rows.
pub type Window = Vec<Vec<f64>>;

/// A set of sliding-window samples extracted from a dense dataset.
///
/// `x[k]` holds `span` consecutive rows, `y[k]` the row immediately
/// following them, and `indexes[k]` the absolute position of `y[k]` in the
/// dense dataset. The indexes are what allow sparse windowed output to be
/// scattered back onto the full timestamp axis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowSet {
    /// Absolute position of each target row in the source dataset.
    pub indexes: Vec<usize>,
    /// Input windows, in position order.
    pub x: Vec<Window>,
    /// Target rows, one per window.
    pub y: Vec<Vec<f64>>,
}

impl WindowSet {
    /// Number of samples in the set.
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Whether the set holds no samples.
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_window_set() {
        let set = WindowSet::default();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_window_set_len() {
        let set = WindowSet {
            indexes: vec![3, 4],
            x: vec![vec![vec![1.0], vec![2.0], vec![3.0]], vec![vec![2.0], vec![3.0], vec![4.0]]],
            y: vec![vec![4.0], vec![5.0]],
        };
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }
}
