use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{PredictorError, Result};
use crate::input::{InputVector, SliderControl, controls};
use crate::predictor::{PredictionResult, Predictor};
use crate::radar::RadarChart;
use crate::stats::{FeatureStatistics, labelled, normalize};

/// Where the dashboard reads its inputs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub stylesheet_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: PathBuf::from("data.csv"),
            model_path: PathBuf::from("model.msgpack"),
            scaler_path: PathBuf::from("scaler.msgpack"),
            stylesheet_path: PathBuf::from("assets/style.css"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Rendering,
}

/// Something the page asks the dashboard to redraw for.
#[derive(Debug, Clone)]
pub enum UiEvent {
    PageLoad,
    SliderChange(InputVector),
}

/// Everything one render cycle produces.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPlan {
    pub input: InputVector,
    pub chart: RadarChart,
    pub prediction: PredictionResult,
}

/// Statistics, artifacts and stylesheet loaded once at startup, plus the
/// render cycle that turns slider values into a chart and a prediction.
pub struct Dashboard {
    stats: FeatureStatistics,
    predictor: Predictor,
    stylesheet: String,
    phase: Mutex<Phase>,
}

impl Dashboard {
    pub fn new(stats: FeatureStatistics, predictor: Predictor, stylesheet: String) -> Self {
        Dashboard {
            stats,
            predictor,
            stylesheet,
            phase: Mutex::new(Phase::Idle),
        }
    }

    /// Reads the dataset, stylesheet and both artifacts. Any failure here
    /// stops startup.
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        let dataset = Dataset::from_csv(&config.data_path)?;
        let stats = FeatureStatistics::from_dataset(&dataset)?;
        let predictor = Predictor::load(&config.scaler_path, &config.model_path)?;

        match predictor.evaluate_on(&dataset) {
            Ok(accuracy) => log::info!("Model accuracy on dataset: {:.2}%", accuracy * 100.0),
            Err(e) => log::warn!("Could not evaluate model on dataset: {e}"),
        }

        let stylesheet =
            std::fs::read_to_string(&config.stylesheet_path).map_err(|source| {
                PredictorError::Io {
                    path: config.stylesheet_path.clone(),
                    source,
                }
            })?;

        Ok(Dashboard::new(stats, predictor, stylesheet))
    }

    pub fn stats(&self) -> &FeatureStatistics {
        &self.stats
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn controls(&self) -> Vec<SliderControl> {
        controls(&self.stats)
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn handle(&self, event: UiEvent) -> Result<RenderPlan> {
        let input = match event {
            UiEvent::PageLoad => InputVector::defaults(&self.stats),
            UiEvent::SliderChange(input) => input,
        };
        self.render(&input)
    }

    /// Runs one render cycle. Cycles never overlap: a second caller waits
    /// until the first is back to idle.
    pub fn render(&self, input: &InputVector) -> Result<RenderPlan> {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        *phase = Phase::Rendering;
        log::debug!("idle -> rendering");

        let result = self.render_cycle(input);

        *phase = Phase::Idle;
        log::debug!("rendering -> idle");
        result
    }

    fn render_cycle(&self, input: &InputVector) -> Result<RenderPlan> {
        let normalized = normalize(input, &self.stats);
        log::trace!("normalized input: {:?}", labelled(&normalized));
        let chart = RadarChart::from_normalized(&normalized);

        let prediction = self.predictor.predict(input)?;
        log::debug!(
            "prediction {:?} (benign {:.4}, malignant {:.4})",
            prediction.diagnosis,
            prediction.probability_benign,
            prediction.probability_malignant
        );

        Ok(RenderPlan {
            input: input.clone(),
            chart,
            prediction,
        })
    }
}
