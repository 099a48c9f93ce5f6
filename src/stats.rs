use ndarray::Axis;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{PredictorError, Result};
use crate::features::{FEATURE_COUNT, FEATURES, index_of};
use crate::input::InputVector;

/// Observed range and mean of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureStat {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl FeatureStat {
    /// Min-max scales `value` into this feature's observed range.
    ///
    /// A constant column (`max == min`) always maps to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            0.0
        } else {
            (value - self.min) / span
        }
    }
}

/// Per-feature statistics over the full dataset, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStatistics {
    stats: Vec<FeatureStat>,
}

impl FeatureStatistics {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let x = dataset.feature_matrix();
        let means = x.mean_axis(Axis(0)).ok_or_else(|| {
            PredictorError::DataFormat("cannot compute statistics of an empty dataset".into())
        })?;
        let mins = x.fold_axis(Axis(0), f64::INFINITY, |&a, &b| a.min(b));
        let maxs = x.fold_axis(Axis(0), f64::NEG_INFINITY, |&a, &b| a.max(b));

        let stats = (0..FEATURE_COUNT)
            .map(|i| FeatureStat {
                min: mins[i],
                max: maxs[i],
                // summation error must not push the mean out of range
                mean: means[i].clamp(mins[i], maxs[i]),
            })
            .collect();

        Ok(FeatureStatistics { stats })
    }

    pub fn get(&self, index: usize) -> &FeatureStat {
        &self.stats[index]
    }

    pub fn by_column(&self, column: &str) -> Option<&FeatureStat> {
        index_of(column).map(|i| &self.stats[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureStat> {
        self.stats.iter()
    }
}

/// Input values min-max scaled per feature, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedVector(pub [f64; FEATURE_COUNT]);

impl NormalizedVector {
    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// Min-max normalizes every input value against the dataset statistics.
pub fn normalize(input: &InputVector, stats: &FeatureStatistics) -> NormalizedVector {
    NormalizedVector(std::array::from_fn(|i| {
        stats.get(i).normalize(input.get(i))
    }))
}

/// Column name of each normalized value, for diagnostics and the wire format.
pub fn labelled(vector: &NormalizedVector) -> Vec<(&'static str, f64)> {
    FEATURES
        .iter()
        .zip(vector.values())
        .map(|(f, &v)| (f.column, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{csv_fixture, ramp};

    fn stats_for(rows: &[(&str, [f64; FEATURE_COUNT])]) -> FeatureStatistics {
        let csv = csv_fixture(rows);
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        FeatureStatistics::from_dataset(&ds).unwrap()
    }

    #[test]
    fn min_mean_max_are_ordered() {
        let stats = stats_for(&[
            ("M", ramp(0.3)),
            ("B", ramp(10.7)),
            ("B", ramp(-2.1)),
        ]);
        for s in stats.iter() {
            assert!(s.min <= s.mean && s.mean <= s.max, "{s:?}");
        }
        let radius = stats.by_column("radius_mean").unwrap();
        assert_eq!(radius.min, -2.1);
        assert_eq!(radius.max, 10.7);
        assert!((radius.mean - 8.9 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn repeated_values_keep_mean_in_range() {
        let stats = stats_for(&[("B", [0.1; FEATURE_COUNT]); 7]);
        for s in stats.iter() {
            assert_eq!(s.min, s.max);
            assert_eq!(s.mean, s.min);
        }
    }

    #[test]
    fn normalize_hits_bounds_exactly() {
        let s = FeatureStat {
            min: 6.981,
            max: 28.11,
            mean: 14.127,
        };
        assert_eq!(s.normalize(s.min), 0.0);
        assert_eq!(s.normalize(s.max), 1.0);
        let mid = s.normalize(s.mean);
        assert!((0.0..=1.0).contains(&mid));
    }

    #[test]
    fn constant_column_normalizes_to_zero() {
        let s = FeatureStat {
            min: 3.0,
            max: 3.0,
            mean: 3.0,
        };
        for v in [0.0, 3.0, 1e9, -4.0] {
            assert_eq!(s.normalize(v), 0.0);
        }
    }

    #[test]
    fn below_min_is_not_clipped() {
        let s = FeatureStat {
            min: 2.0,
            max: 4.0,
            mean: 3.0,
        };
        assert_eq!(s.normalize(0.0), -1.0);
    }
}
