//! # cell_predictor 🔬
//!
//! An interactive dashboard for breast cancer cell-nucleus measurements.
//!
//! Thirty sliders, one per measurement, are bound to the statistics of the
//! diagnostic dataset. Every change redraws a radar chart comparing the mean,
//! standard-error and worst values of the ten base measurements, and asks a
//! previously trained classifier whether the cell cluster looks benign or
//! malignant.
//!
//! ## Features
//! - CSV loading with a fixed column schema (`diagnosis` encoded M = 1, B = 0)
//! - Per-feature min / max / mean statistics and min-max normalization
//! - Radar chart emitted as a Plotly figure
//! - Prediction with a standard scaler and a logistic regression or
//!   [`linfa-bayes`](https://crates.io/crates/linfa-bayes) Gaussian naive Bayes model
//! - Artifacts stored as MessagePack with `rmp-serde`
//! - A single-page web UI served with `axum`
//!
//! ## Example
//! ```no_run
//! use cell_predictor::{Dashboard, DashboardConfig, UiEvent};
//!
//! let dashboard = Dashboard::load(&DashboardConfig::default())?;
//! let plan = dashboard.handle(UiEvent::PageLoad)?;
//! println!("{}", plan.prediction);
//! # Ok::<(), cell_predictor::PredictorError>(())
//! ```

pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod features;
pub mod input;
pub mod predictor;
pub mod radar;
pub mod server;
pub mod stats;

pub use dashboard::{Dashboard, DashboardConfig, Phase, RenderPlan, UiEvent};
pub use dataset::{Dataset, Diagnosis, FeatureRecord};
pub use error::{PredictorError, Result};
pub use input::{InputVector, SliderControl};
pub use predictor::{Classifier, ModelArtifact, PredictionResult, Predictor, StandardScaler};
pub use radar::RadarChart;
pub use stats::{FeatureStatistics, NormalizedVector, normalize};
