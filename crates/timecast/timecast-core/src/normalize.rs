//! Per-feature min-max normalization and its exact inverse.

use timecast_spi::NormalizationParams;

/// Min-max scaler bringing each feature into `[0, 1]`.
pub struct Normalizer;

impl Normalizer {
    /// Compute elementwise min/max over the dataset.
    ///
    /// Missing values count as zero for the min/max computation only; they
    /// are not imputed in the dataset itself.
    pub fn fit(dataset: &[Vec<f64>]) -> NormalizationParams {
        let nb_features = dataset.first().map_or(0, |row| row.len());
        let mut mins = vec![f64::INFINITY; nb_features];
        let mut maxs = vec![f64::NEG_INFINITY; nb_features];

        for row in dataset {
            for (j, &v) in row.iter().enumerate() {
                let v = if v.is_nan() { 0.0 } else { v };
                mins[j] = mins[j].min(v);
                maxs[j] = maxs[j].max(v);
            }
        }

        NormalizationParams::new(mins, maxs)
    }

    /// Map each value `v` to `1 - (max - v) / (max - min)`.
    ///
    /// A degenerate feature with `max == min` maps to a constant 0.5 to
    /// avoid dividing by zero. `NaN` values stay `NaN` so that windowing
    /// can still skip them.
    pub fn apply(dataset: &[Vec<f64>], params: &NormalizationParams) -> Vec<Vec<f64>> {
        let ranges = params.ranges();
        dataset
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, &v)| {
                        if v.is_nan() {
                            f64::NAN
                        } else if ranges[j] == 0.0 {
                            0.5
                        } else {
                            1.0 - (params.maxs[j] - v) / ranges[j]
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Invert the scaling: `max - (max - min) * (1 - v')`.
    pub fn invert(dataset: &[Vec<f64>], params: &NormalizationParams) -> Vec<Vec<f64>> {
        let ranges = params.ranges();
        dataset
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, &v)| params.maxs[j] - ranges[j] * (1.0 - v))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_fit_per_feature_min_max() {
        let dataset = vec![vec![1.0, 10.0], vec![3.0, -5.0], vec![2.0, 0.0]];
        let params = Normalizer::fit(&dataset);
        assert_eq!(params.mins, vec![1.0, -5.0]);
        assert_eq!(params.maxs, vec![3.0, 10.0]);
    }

    #[test]
    fn test_fit_treats_nan_as_zero() {
        let dataset = vec![vec![5.0], vec![f64::NAN], vec![8.0]];
        let params = Normalizer::fit(&dataset);
        // The NaN row contributes a zero, pulling the minimum down.
        assert_eq!(params.mins, vec![0.0]);
        assert_eq!(params.maxs, vec![8.0]);
    }

    #[test]
    fn test_apply_invert_round_trip() {
        let dataset = vec![vec![1.0, -4.0], vec![3.0, 0.0], vec![2.5, 12.0]];
        let params = Normalizer::fit(&dataset);
        let scaled = Normalizer::apply(&dataset, &params);
        let back = Normalizer::invert(&scaled, &params);

        for (row, orig) in back.iter().zip(dataset.iter()) {
            for (&v, &o) in row.iter().zip(orig.iter()) {
                assert!(close(v, o), "expected {} got {}", o, v);
            }
        }
    }

    #[test]
    fn test_apply_maps_into_unit_interval() {
        let dataset = vec![vec![2.0], vec![4.0], vec![6.0]];
        let params = Normalizer::fit(&dataset);
        let scaled = Normalizer::apply(&dataset, &params);
        assert!(close(scaled[0][0], 0.0));
        assert!(close(scaled[1][0], 0.5));
        assert!(close(scaled[2][0], 1.0));
    }

    #[test]
    fn test_degenerate_constant_column_no_division_error() {
        let dataset = vec![vec![7.0], vec![7.0], vec![7.0]];
        let params = Normalizer::fit(&dataset);
        let scaled = Normalizer::apply(&dataset, &params);
        for row in &scaled {
            assert!(close(row[0], 0.5));
        }
        // Inverting the constant output recovers the constant input.
        let back = Normalizer::invert(&scaled, &params);
        for row in &back {
            assert!(close(row[0], 7.0));
        }
    }

    #[test]
    fn test_apply_keeps_nan() {
        let dataset = vec![vec![1.0], vec![f64::NAN], vec![3.0]];
        let params = Normalizer::fit(&dataset);
        let scaled = Normalizer::apply(&dataset, &params);
        assert!(scaled[1][0].is_nan());
    }
}
