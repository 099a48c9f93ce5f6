use std::collections::HashMap;

use serde::Serialize;

use crate::error::{PredictorError, Result};
use crate::features::{FEATURE_COUNT, FEATURES, Variant, index_of};
use crate::stats::FeatureStatistics;

/// A sidebar slider bound to one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderControl {
    pub column: &'static str,
    pub label: &'static str,
    #[serde(skip)]
    pub variant: Variant,
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

/// One slider per feature: floor 0, ceiling the observed max, starting at the
/// observed mean. Order follows the feature catalog and must not change.
pub fn controls(stats: &FeatureStatistics) -> Vec<SliderControl> {
    FEATURES
        .iter()
        .zip(stats.iter())
        .map(|(f, s)| SliderControl {
            column: f.column,
            label: f.label,
            variant: f.variant,
            min: 0.0,
            max: s.max,
            value: s.mean,
        })
        .collect()
}

/// Raw slider values for a single interaction, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputVector([f64; FEATURE_COUNT]);

impl InputVector {
    /// Every slider at its default position.
    pub fn defaults(stats: &FeatureStatistics) -> Self {
        InputVector(std::array::from_fn(|i| stats.get(i).mean))
    }

    /// Builds an input from values already in catalog order, clamped to the
    /// slider range.
    pub fn from_values(values: [f64; FEATURE_COUNT], stats: &FeatureStatistics) -> Self {
        InputVector(std::array::from_fn(|i| {
            clamp_to_slider(FEATURES[i].column, values[i], stats.get(i).max)
        }))
    }

    /// Builds an input from a column-name keyed map.
    ///
    /// Every feature must be present exactly once and no unknown names are
    /// accepted; values are never matched up by position.
    pub fn from_map(values: &HashMap<String, f64>, stats: &FeatureStatistics) -> Result<Self> {
        if let Some(unknown) = values.keys().find(|k| index_of(k).is_none()) {
            return Err(PredictorError::ShapeMismatch(format!(
                "unknown feature {unknown:?}"
            )));
        }

        let mut out = [0.0; FEATURE_COUNT];
        for (i, f) in FEATURES.iter().enumerate() {
            let value = values.get(f.column).ok_or_else(|| {
                PredictorError::ShapeMismatch(format!("missing feature {:?}", f.column))
            })?;
            if !value.is_finite() {
                return Err(PredictorError::ShapeMismatch(format!(
                    "feature {:?} is not a finite number",
                    f.column
                )));
            }
            out[i] = *value;
        }

        Ok(Self::from_values(out, stats))
    }

    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        FEATURES
            .iter()
            .zip(self.0.iter())
            .map(|(f, &v)| (f.column.to_string(), v))
            .collect()
    }
}

fn clamp_to_slider(column: &str, value: f64, max: f64) -> f64 {
    let clamped = value.clamp(0.0, max.max(0.0));
    if clamped != value {
        log::warn!("{column} = {value} is outside [0, {max}], using {clamped}");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::dataset::tests::{csv_fixture, ramp};

    fn stats() -> FeatureStatistics {
        let csv = csv_fixture(&[("M", ramp(1.0)), ("B", ramp(3.0))]);
        FeatureStatistics::from_dataset(&Dataset::from_reader(csv.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn controls_follow_catalog_order() {
        let stats = stats();
        let controls = controls(&stats);
        assert_eq!(controls.len(), FEATURE_COUNT);
        assert_eq!(controls[0].label, "Radius (mean)");
        assert_eq!(controls[7].column, "concave points_mean");
        assert_eq!(controls[10].variant, Variant::StandardError);
        assert_eq!(controls[29].label, "Fractal dimension (worst)");
        for c in &controls {
            assert_eq!(c.min, 0.0);
            assert!(c.value <= c.max);
        }
        assert_eq!(controls[0].max, 3.0);
        assert_eq!(controls[0].value, 2.0);
    }

    #[test]
    fn map_round_trips_and_clamps() {
        let stats = stats();
        let mut map = InputVector::defaults(&stats).to_map();
        map.insert("area_worst".into(), 1e6);
        map.insert("radius_se".into(), -5.0);

        let input = InputVector::from_map(&map, &stats).unwrap();
        let area = index_of("area_worst").unwrap();
        assert_eq!(input.get(area), stats.get(area).max);
        assert_eq!(input.get(index_of("radius_se").unwrap()), 0.0);
    }

    #[test]
    fn map_rejects_missing_and_unknown_names() {
        let stats = stats();
        let mut map = InputVector::defaults(&stats).to_map();
        let v = map.remove("concave points_mean").unwrap();
        map.insert("concave_points_mean".into(), v);
        assert!(matches!(
            InputVector::from_map(&map, &stats),
            Err(PredictorError::ShapeMismatch(_))
        ));

        map.remove("concave_points_mean");
        assert!(matches!(
            InputVector::from_map(&map, &stats),
            Err(PredictorError::ShapeMismatch(_))
        ));
    }
}
