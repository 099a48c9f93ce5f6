//! The dashboard page and its JSON endpoints.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dashboard::{Dashboard, RenderPlan, UiEvent};
use crate::error::PredictorError;
use crate::features::Variant;
use crate::input::{InputVector, SliderControl};
use crate::predictor::PredictionResult;

pub const PAGE_TITLE: &str = "Breast Cancer Predictor";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub values: HashMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub chart: Value,
    pub prediction: PredictionResult,
    pub prediction_html: String,
}

impl From<&RenderPlan> for RenderResponse {
    fn from(plan: &RenderPlan) -> Self {
        RenderResponse {
            chart: plan.chart.to_plotly(),
            prediction: plan.prediction,
            prediction_html: plan.prediction.to_html(),
        }
    }
}

/// Maps library errors onto HTTP responses.
pub struct ApiError(PredictorError);

impl From<PredictorError> for ApiError {
    fn from(err: PredictorError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            PredictorError::ShapeMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log::error!("render failed: {}", self.0);
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/controls", get(list_controls))
        .route("/api/render", post(render))
        .with_state(dashboard)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_controls(State(dashboard): State<Arc<Dashboard>>) -> Json<Vec<SliderControl>> {
    Json(dashboard.controls())
}

async fn render(
    State(dashboard): State<Arc<Dashboard>>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, ApiError> {
    let input = InputVector::from_map(&req.values, dashboard.stats())?;
    let plan = dashboard.handle(UiEvent::SliderChange(input))?;
    Ok(Json(RenderResponse::from(&plan)))
}

async fn index(State(dashboard): State<Arc<Dashboard>>) -> Result<Html<String>, ApiError> {
    let plan = dashboard.handle(UiEvent::PageLoad)?;
    Ok(Html(render_page(&dashboard, &plan)))
}

/// Renders the whole page with the page-load plan already drawn.
pub fn render_page(dashboard: &Dashboard, plan: &RenderPlan) -> String {
    let mut sidebar = String::new();
    let controls = dashboard.controls();
    for variant in Variant::ALL {
        let _ = writeln!(sidebar, "<h4>{}</h4>", variant.heading());
        for c in controls.iter().filter(|c| c.variant == variant) {
            let _ = writeln!(
                sidebar,
                "<label>{label} <output>{value:.4}</output>\
                 <input type=\"range\" name=\"{column}\" min=\"{min}\" max=\"{max}\" \
                 step=\"any\" value=\"{value}\"></label>",
                label = c.label,
                column = c.column,
                min = c.min,
                max = c.max,
                value = c.value,
            );
        }
    }

    let figure = plan.chart.to_plotly().to_string();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{PAGE_TITLE}</title>
<script src="{PLOTLY_CDN}"></script>
<style>{stylesheet}</style>
</head>
<body>
<aside class="sidebar">
<h2>Cell Nuclei Measurements</h2>
<form id="controls">
{sidebar}</form>
</aside>
<main>
<h1>{PAGE_TITLE}</h1>
<p>Use this tool to analyze breast cancer cell measurements.</p>
<div class="columns">
<div id="chart" style="flex: 4"></div>
<div id="prediction" style="flex: 1">{prediction}</div>
</div>
</main>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout);
const form = document.getElementById("controls");
form.addEventListener("input", async (event) => {{
  event.target.previousElementSibling.value = Number(event.target.value).toFixed(4);
  const values = {{}};
  for (const el of form.querySelectorAll("input[type=range]")) {{
    values[el.name] = Number(el.value);
  }}
  const res = await fetch("/api/render", {{
    method: "POST",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify({{ values }}),
  }});
  if (!res.ok) return;
  const body = await res.json();
  Plotly.react("chart", body.chart.data, body.chart.layout);
  document.getElementById("prediction").innerHTML = body.prediction_html;
}});
</script>
</body>
</html>
"#,
        stylesheet = dashboard.stylesheet(),
        prediction = plan.prediction.to_html(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::dataset::tests::{csv_fixture, ramp};
    use crate::predictor::tests::logistic_predictor;
    use crate::stats::FeatureStatistics;

    #[test]
    fn page_injects_stylesheet_and_groups_sliders() {
        let csv = csv_fixture(&[("M", ramp(1.0)), ("B", ramp(5.0))]);
        let stats =
            FeatureStatistics::from_dataset(&Dataset::from_reader(csv.as_bytes()).unwrap())
                .unwrap();
        let dash = Dashboard::new(stats, logistic_predictor(), ".benign { color: green; }".into());
        let plan = dash.handle(UiEvent::PageLoad).unwrap();
        let page = render_page(&dash, &plan);

        assert!(page.contains("<style>.benign { color: green; }</style>"));
        assert_eq!(page.matches("type=\"range\"").count(), 30);
        let mean = page.find("<h4>Mean</h4>").unwrap();
        let se = page.find("<h4>Standard error</h4>").unwrap();
        let worst = page.find("<h4>Worst</h4>").unwrap();
        assert!(mean < se && se < worst);
        assert!(page.find("name=\"radius_se\"").unwrap() > se);
        assert!(page.contains("name=\"concave points_worst\""));
        assert!(page.contains("Cell Cluster Prediction"));

        // sliders must not snap away from the observed mean
        assert_eq!(page.matches("step=\"any\"").count(), 30);
        let radius = dash.stats().get(0);
        assert!(page.contains(&format!(
            "name=\"radius_mean\" min=\"0\" max=\"{}\" step=\"any\" value=\"{}\"",
            radius.max, radius.mean
        )));
    }
}
