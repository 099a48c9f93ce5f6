use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::Array2;
use serde::Serialize;

use crate::error::{PredictorError, Result};
use crate::features::{FEATURE_COUNT, FEATURES};

const DIAGNOSIS_COLUMN: &str = "diagnosis";

/// Ground-truth label of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    /// Parses the dataset's one-letter code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "M" => Some(Diagnosis::Malignant),
            "B" => Some(Diagnosis::Benign),
            _ => None,
        }
    }

    /// Binary encoding used by the classifier: malignant is 1.
    pub fn as_class(self) -> usize {
        match self {
            Diagnosis::Benign => 0,
            Diagnosis::Malignant => 1,
        }
    }
}

/// A single observation: 30 measurements in catalog order and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub values: [f64; FEATURE_COUNT],
    pub diagnosis: Diagnosis,
}

/// The cleaned dataset, loaded once at startup and never modified.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<FeatureRecord>,
}

impl Dataset {
    /// Loads the dataset from a CSV file.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| PredictorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        log::info!("Loaded {} records from {:?}", dataset.len(), path);
        Ok(dataset)
    }

    /// Loads the dataset from any CSV source with a header row.
    ///
    /// Only the 30 feature columns and `diagnosis` are kept; the identifier and
    /// any unnamed trailing columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().map_err(csv_error)?.clone();
        let find = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                PredictorError::DataFormat(format!("missing required column {name:?}"))
            })
        };

        let mut feature_idx = [0usize; FEATURE_COUNT];
        for (slot, f) in feature_idx.iter_mut().zip(FEATURES.iter()) {
            *slot = find(f.column)?;
        }
        let diagnosis_idx = find(DIAGNOSIS_COLUMN)?;

        let mut records = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(csv_error)?;
            // header is line 1
            let line = row + 2;
            let cell = |idx: usize| record.get(idx).unwrap_or("");

            let mut values = [0.0; FEATURE_COUNT];
            for (i, &idx) in feature_idx.iter().enumerate() {
                let raw = cell(idx);
                let value: f64 = raw.parse().map_err(|_| {
                    PredictorError::DataFormat(format!(
                        "line {line}: column {:?} is not a number: {raw:?}",
                        FEATURES[i].column
                    ))
                })?;
                // "NaN" and "inf" parse as f64 but would poison the statistics
                if !value.is_finite() {
                    return Err(PredictorError::DataFormat(format!(
                        "line {line}: column {:?} is not a finite number: {raw:?}",
                        FEATURES[i].column
                    )));
                }
                values[i] = value;
            }

            let code = cell(diagnosis_idx);
            let diagnosis = Diagnosis::from_code(code).ok_or_else(|| {
                PredictorError::DataFormat(format!(
                    "line {line}: diagnosis must be \"M\" or \"B\", got {code:?}"
                ))
            })?;

            records.push(FeatureRecord { values, diagnosis });
        }

        if records.is_empty() {
            return Err(PredictorError::DataFormat(
                "dataset has no records".to_string(),
            ));
        }

        Ok(Dataset { records })
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Feature matrix with one row per record, columns in catalog order.
    pub fn feature_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.records.len(), FEATURE_COUNT), |(r, c)| {
            self.records[r].values[c]
        })
    }

    /// Encoded labels, malignant = 1.
    pub fn labels(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.diagnosis.as_class()).collect()
    }
}

fn csv_error(err: csv::Error) -> PredictorError {
    PredictorError::DataFormat(err.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::features::column_names;

    /// Builds a CSV in the dataset's layout: id, diagnosis, 30 features and an
    /// empty trailing column.
    pub(crate) fn csv_fixture(rows: &[(&str, [f64; FEATURE_COUNT])]) -> String {
        let mut out = format!("id,diagnosis,{},\n", column_names().join(","));
        for (i, (code, values)) in rows.iter().enumerate() {
            let cells: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            out.push_str(&format!("{},{},{},\n", 842302 + i, code, cells.join(",")));
        }
        out
    }

    pub(crate) fn ramp(offset: f64) -> [f64; FEATURE_COUNT] {
        std::array::from_fn(|i| offset + i as f64)
    }

    #[test]
    fn drops_id_and_encodes_labels() {
        let csv = csv_fixture(&[("M", ramp(1.0)), ("B", ramp(2.0))]);
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.labels(), vec![1, 0]);
        assert_eq!(ds.records()[0].values[0], 1.0);
        assert_eq!(ds.records()[1].values[29], 31.0);
        assert_eq!(ds.feature_matrix().dim(), (2, FEATURE_COUNT));
    }

    #[test]
    fn missing_column_is_a_format_error() {
        let csv = csv_fixture(&[("M", ramp(1.0))]).replacen("concave points_se", "cp_se", 1);
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            PredictorError::DataFormat(msg) => assert!(msg.contains("concave points_se")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_unknown_diagnosis_and_bad_numbers() {
        let csv = csv_fixture(&[("X", ramp(1.0))]);
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(PredictorError::DataFormat(_))
        ));

        let csv = csv_fixture(&[("B", ramp(1.0))]).replacen(",1,", ",abc,", 1);
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(PredictorError::DataFormat(_))
        ));
    }

    #[test]
    fn rejects_non_finite_cells() {
        for bad in ["NaN", "inf", "-inf"] {
            let csv = csv_fixture(&[("B", ramp(1.0)), ("M", ramp(2.0))])
                .replacen(",3,", &format!(",{bad},"), 1);
            match Dataset::from_reader(csv.as_bytes()) {
                Err(PredictorError::DataFormat(msg)) => {
                    assert!(msg.contains("not a finite number"), "{bad}: {msg}")
                }
                other => panic!("{bad}: expected a format error, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let csv = csv_fixture(&[]);
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(PredictorError::DataFormat(_))
        ));
    }
}
