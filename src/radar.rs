//! Radar chart comparing the mean, standard-error and worst variants of the
//! ten base measurements.
//!
//! The chart is a plain value that serializes to a Plotly figure; the page
//! hands it to `Plotly.react` unchanged.

use serde::Serialize;
use serde_json::{Value, json};

use crate::features::{Category, FEATURES, Variant, index_for};
use crate::stats::NormalizedVector;

pub const CHART_TITLE: &str = "Breast Cancer Feature Analysis";
pub const LEGEND_TITLE: &str = "Feature Categories";
pub const TICK_VALUES: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
pub const TICK_TEXT: [&str; 5] = ["0%", "25%", "50%", "75%", "100%"];

/// One filled polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarTrace {
    pub variant: Variant,
    pub name: &'static str,
    /// Radius per axis, same order as [`RadarChart::axes`].
    pub r: Vec<f64>,
    pub color: &'static str,
    pub opacity: f64,
    pub dash: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub axes: Vec<&'static str>,
    pub traces: Vec<RadarTrace>,
}

impl RadarChart {
    /// Builds the chart from normalized inputs.
    ///
    /// All 30 values are divided by their common maximum so the largest one
    /// lands on the outer ring. When that maximum is not positive the values
    /// are drawn unscaled (an all-zero input is an all-zero chart).
    pub fn from_normalized(normalized: &NormalizedVector) -> Self {
        let group_max = normalized
            .values()
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let divisor = if group_max.is_finite() && group_max > 0.0 {
            group_max
        } else {
            log::debug!("radar group max is {group_max}, skipping rescale");
            1.0
        };

        let traces = Variant::ALL
            .iter()
            .map(|&variant| {
                let r = Category::ALL
                    .iter()
                    .map(|&c| normalized.get(index_for(c, variant)) / divisor)
                    .collect();
                let (color, opacity, dash) = trace_style(variant);
                RadarTrace {
                    variant,
                    name: variant.trace_name(),
                    r,
                    color,
                    opacity,
                    dash,
                }
            })
            .collect();

        RadarChart {
            axes: Category::ALL.iter().map(|c| c.display_name()).collect(),
            traces,
        }
    }

    pub fn trace(&self, variant: Variant) -> Option<&RadarTrace> {
        self.traces.iter().find(|t| t.variant == variant)
    }

    /// Largest radius over every trace.
    pub fn peak(&self) -> f64 {
        self.traces
            .iter()
            .flat_map(|t| t.r.iter().copied())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Plotly figure JSON (`data` and `layout`).
    pub fn to_plotly(&self) -> Value {
        let data: Vec<Value> = self
            .traces
            .iter()
            .map(|t| {
                let mut line = json!({ "color": t.color });
                if let Some(dash) = t.dash {
                    line["dash"] = json!(dash);
                }
                json!({
                    "type": "scatterpolar",
                    "r": t.r,
                    "theta": self.axes,
                    "text": columns_for(t.variant),
                    "fill": "toself",
                    "name": t.name,
                    "marker": { "color": t.color },
                    "line": line,
                    "opacity": t.opacity,
                })
            })
            .collect();

        json!({
            "data": data,
            "layout": {
                "title": { "text": CHART_TITLE },
                "polar": {
                    "radialaxis": {
                        "visible": true,
                        "range": [0.0, 1.0],
                        "showticklabels": true,
                        "tickmode": "array",
                        "tickvals": TICK_VALUES,
                        "ticktext": TICK_TEXT,
                        "gridcolor": "gray",
                        "gridwidth": 0.3,
                    }
                },
                "legend": {
                    "title": { "text": LEGEND_TITLE },
                    "orientation": "h",
                    "yanchor": "bottom",
                    "y": -0.2,
                },
                "showlegend": true,
            }
        })
    }
}

fn trace_style(variant: Variant) -> (&'static str, f64, Option<&'static str>) {
    match variant {
        Variant::Mean => ("blue", 0.6, None),
        Variant::StandardError => ("gray", 0.8, Some("dot")),
        Variant::Worst => ("red", 0.5, None),
    }
}

/// Column feeding each point of a trace; used to label hover text.
pub fn columns_for(variant: Variant) -> Vec<&'static str> {
    Category::ALL
        .iter()
        .map(|&c| FEATURES[index_for(c, variant)].column)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;

    #[test]
    fn rescales_so_the_peak_is_one() {
        let values: [f64; FEATURE_COUNT] = std::array::from_fn(|i| (i as f64 * 0.37) % 0.8);
        let chart = RadarChart::from_normalized(&NormalizedVector(values));
        assert!((chart.peak() - 1.0).abs() < 1e-12);
        assert_eq!(chart.traces.len(), 3);
        for t in &chart.traces {
            assert_eq!(t.r.len(), 10);
        }
    }

    #[test]
    fn traces_pick_columns_by_variant() {
        let mut values = [0.0; FEATURE_COUNT];
        values[index_for(Category::ConcavePoints, Variant::StandardError)] = 0.5;
        values[index_for(Category::Area, Variant::Worst)] = 0.25;
        let chart = RadarChart::from_normalized(&NormalizedVector(values));

        let se = chart.trace(Variant::StandardError).unwrap();
        assert_eq!(se.r[7], 1.0);
        assert_eq!(se.dash, Some("dot"));
        let worst = chart.trace(Variant::Worst).unwrap();
        assert_eq!(worst.r[3], 0.5);
        assert_eq!(chart.axes[7], "Concave Points");
        assert_eq!(columns_for(Variant::Worst)[7], "concave points_worst");
    }

    #[test]
    fn all_zero_input_draws_an_empty_chart() {
        let chart = RadarChart::from_normalized(&NormalizedVector([0.0; FEATURE_COUNT]));
        assert_eq!(chart.peak(), 0.0);
        assert!(chart.traces.iter().all(|t| t.r.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn plotly_figure_has_axis_ticks_and_legend() {
        let chart = RadarChart::from_normalized(&NormalizedVector([0.5; FEATURE_COUNT]));
        let fig = chart.to_plotly();
        assert_eq!(fig["data"].as_array().unwrap().len(), 3);
        assert_eq!(fig["data"][0]["fill"], "toself");
        assert_eq!(fig["data"][1]["line"]["dash"], "dot");
        assert_eq!(fig["layout"]["polar"]["radialaxis"]["ticktext"][4], "100%");
        assert_eq!(fig["layout"]["legend"]["orientation"], "h");
    }
}
