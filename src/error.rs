use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the dataset and artifacts or rendering a prediction.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// The dataset is missing a required column or holds a malformed cell.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// A scaler or model artifact could not be read or deserialized.
    #[error("failed to load {artifact} from {path:?}: {reason}")]
    ModelLoad {
        artifact: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// Feature count or order disagrees with what the artifacts expect.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PredictorError>;
