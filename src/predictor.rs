//! Inference with the externally trained scaler and classifier.
//!
//! Both artifacts are MessagePack documents. Each lists the feature columns it
//! was fitted on; a list that differs from the catalog in count or order is
//! rejected rather than silently realigned.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use linfa_bayes::{GaussianNb, NaiveBayes};
use ndarray::{Array1, Array2};
use rmp_serde::{decode::from_read, encode::write_named};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::dataset::{Dataset, Diagnosis};
use crate::error::{PredictorError, Result};
use crate::features::{FEATURE_COUNT, column_names};
use crate::input::InputVector;

pub const DISCLAIMER: &str =
    "This app assists in diagnosis but does NOT replace professional medical advice.";

/// Standard scaling fitted on the training set: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Array1<f64>,
    pub scale: Array1<f64>,
}

impl StandardScaler {
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(PredictorError::ShapeMismatch(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                x.ncols()
            )));
        }
        // zero variance columns pass through centred, as scikit-style scalers do
        let scale = self.scale.mapv(|s| if s == 0.0 { 1.0 } else { s });
        Ok((x - &self.mean) / &scale)
    }

    fn validate(&self) -> Result<()> {
        check_feature_names("scaler", &self.feature_names)?;
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(PredictorError::ShapeMismatch(format!(
                "scaler has {} means and {} scales, expected {FEATURE_COUNT}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }
}

/// A fitted binary classifier over classes 0 (benign) and 1 (malignant).
#[derive(Serialize, Deserialize)]
pub enum Classifier {
    Logistic {
        coefficients: Array1<f64>,
        intercept: f64,
    },
    GaussianNb(GaussianNb<f64, usize>),
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Logistic { .. } => "logistic regression",
            Classifier::GaussianNb(_) => "gaussian naive bayes",
        }
    }

    /// Class probabilities `[benign, malignant]` for each row of `x`.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        match self {
            Classifier::Logistic {
                coefficients,
                intercept,
            } => {
                if x.ncols() != coefficients.len() {
                    return Err(PredictorError::ShapeMismatch(format!(
                        "model expects {} features, got {}",
                        coefficients.len(),
                        x.ncols()
                    )));
                }
                let z = x.dot(coefficients) + *intercept;
                Ok(Array2::from_shape_fn((x.nrows(), 2), |(r, c)| {
                    let p1 = sigmoid(z[r]);
                    if c == 1 { p1 } else { 1.0 - p1 }
                }))
            }
            Classifier::GaussianNb(model) => {
                let (proba, classes) = model.predict_proba(x.view());
                let column = |class: usize| {
                    classes.iter().position(|&c| *c == class).ok_or_else(|| {
                        PredictorError::ShapeMismatch(format!(
                            "model was not fitted on class {class}"
                        ))
                    })
                };
                let benign = column(0)?;
                let malignant = column(1)?;
                Ok(Array2::from_shape_fn((x.nrows(), 2), |(r, c)| {
                    proba[[r, if c == 1 { malignant } else { benign }]]
                }))
            }
        }
    }

    /// Predicted label per row; malignant only when it is strictly more likely.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<Diagnosis>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                if row[1] > row[0] {
                    Diagnosis::Malignant
                } else {
                    Diagnosis::Benign
                }
            })
            .collect())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// The model artifact: a classifier and the columns it was trained on.
#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub classifier: Classifier,
}

impl ModelArtifact {
    fn validate(&self) -> Result<()> {
        check_feature_names("model", &self.feature_names)?;
        match &self.classifier {
            Classifier::Logistic { coefficients, .. } if coefficients.len() != FEATURE_COUNT => {
                Err(PredictorError::ShapeMismatch(format!(
                    "model has {} coefficients, expected {FEATURE_COUNT}",
                    coefficients.len()
                )))
            }
            _ => Ok(()),
        }
    }
}

fn check_feature_names(artifact: &str, names: &[String]) -> Result<()> {
    let expected = column_names();
    if names.len() != expected.len() {
        return Err(PredictorError::ShapeMismatch(format!(
            "{artifact} was fitted on {} features, expected {}",
            names.len(),
            expected.len()
        )));
    }
    if let Some((i, (got, want))) = names
        .iter()
        .zip(expected.iter())
        .enumerate()
        .find(|(_, (a, b))| a != b)
    {
        return Err(PredictorError::ShapeMismatch(format!(
            "{artifact} feature #{i} is {got:?}, expected {want:?}"
        )));
    }
    Ok(())
}

/// Writes an artifact as named MessagePack.
pub fn save_artifact<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let io_err = |source| PredictorError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_named(&mut writer, value).map_err(|e| {
        io_err(std::io::Error::other(e.to_string()))
    })
}

fn load_artifact<T: DeserializeOwned>(artifact: &'static str, path: &Path) -> Result<T> {
    let load_err = |reason: String| PredictorError::ModelLoad {
        artifact,
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
    from_read(BufReader::new(file)).map_err(|e| load_err(e.to_string()))
}

/// Label and class probabilities for one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub diagnosis: Diagnosis,
    pub probability_benign: f64,
    pub probability_malignant: f64,
}

impl PredictionResult {
    /// Renders the prediction panel body.
    pub fn to_html(&self) -> String {
        let label = match self.diagnosis {
            Diagnosis::Benign => "<span class='diagnosis benign'>Benign</span>",
            Diagnosis::Malignant => "<span class='diagnosis malicious'>Malignant</span>",
        };
        format!(
            "<h3>Cell Cluster Prediction</h3>\n\
             <p>The cell cluster is:</p>\n\
             {label}\n\
             <p>Probability of being benign: {}</p>\n\
             <p>Probability of being malignant: {}</p>\n\
             <p class='disclaimer'>{DISCLAIMER}</p>",
            round4(self.probability_benign),
            round4(self.probability_malignant),
        )
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.diagnosis {
            Diagnosis::Benign => "Benign",
            Diagnosis::Malignant => "Malignant",
        };
        write!(
            f,
            "The cell cluster is: {label}\n\
             Probability of being benign: {}\n\
             Probability of being malignant: {}\n\
             {DISCLAIMER}",
            round4(self.probability_benign),
            round4(self.probability_malignant),
        )
    }
}

/// Rounds a probability to four decimal places for display.
pub fn round4(p: f64) -> f64 {
    (p * 10_000.0).round() / 10_000.0
}

/// Scaler and classifier, loaded once and shared read-only.
pub struct Predictor {
    scaler: StandardScaler,
    model: ModelArtifact,
}

impl Predictor {
    pub fn new(scaler: StandardScaler, model: ModelArtifact) -> Result<Self> {
        scaler.validate()?;
        model.validate()?;
        Ok(Predictor { scaler, model })
    }

    /// Deserializes both artifacts, failing on the first that cannot be read.
    pub fn load(scaler_path: &Path, model_path: &Path) -> Result<Self> {
        let scaler: StandardScaler = load_artifact("scaler", scaler_path)?;
        let model: ModelArtifact = load_artifact("model", model_path)?;
        let predictor = Predictor::new(scaler, model)?;
        log::info!(
            "Loaded scaler from {:?} and {} model from {:?}",
            scaler_path,
            predictor.model.classifier.kind(),
            model_path
        );
        Ok(predictor)
    }

    pub fn classifier(&self) -> &Classifier {
        &self.model.classifier
    }

    /// Scales the raw input and classifies it.
    pub fn predict(&self, input: &InputVector) -> Result<PredictionResult> {
        let x = Array2::from_shape_vec((1, FEATURE_COUNT), input.values().to_vec())
            .map_err(|e| PredictorError::ShapeMismatch(e.to_string()))?;
        let scaled = self.scaler.transform(&x)?;
        let proba = self.model.classifier.predict_proba(&scaled)?;
        let diagnosis = self.model.classifier.predict(&scaled)?[0];

        Ok(PredictionResult {
            diagnosis,
            probability_benign: proba[[0, 0]],
            probability_malignant: proba[[0, 1]],
        })
    }

    /// Fraction of records whose label the model reproduces.
    pub fn evaluate_on(&self, dataset: &Dataset) -> Result<f64> {
        let x = self.scaler.transform(&dataset.feature_matrix())?;
        let predicted = self.model.classifier.predict(&x)?;
        let correct = predicted
            .iter()
            .zip(dataset.records())
            .filter(|(p, r)| **p == r.diagnosis)
            .count();
        Ok(correct as f64 / dataset.len() as f64)
    }
}
