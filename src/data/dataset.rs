//! In-memory dataset backed by a polars `DataFrame`

use std::io::Cursor;
use std::path::Path;

use ndarray::{Array1, Array2};
use polars::prelude::*;

use crate::error::{PredictorError, Result};

use super::TARGET_COLUMN;

/// A parsed table whose target column holds exactly two distinct values
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    df: DataFrame,
}

impl Dataset {
    /// Parse an uploaded CSV file.
    ///
    /// Checks run in the order a caller would hit them: the file extension,
    /// then CSV parsing, then the presence of [`TARGET_COLUMN`], then that
    /// the target is binary.
    pub fn from_csv_upload(file_name: &str, bytes: &[u8]) -> Result<Self> {
        if !file_name.ends_with(".csv") {
            return Err(PredictorError::InvalidFileType(file_name.to_string()));
        }

        let df = CsvReadOptions::default()
            .with_infer_schema_length(None)
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        Self::from_frame(file_name, df)
    }

    /// Load a CSV file from disk (used by the CLI)
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_csv_upload(&file_name, &bytes)
    }

    /// Wrap an existing frame, validating the target column
    pub fn from_frame(name: impl Into<String>, df: DataFrame) -> Result<Self> {
        let has_target = df
            .get_column_names()
            .iter()
            .any(|c| c.as_str() == TARGET_COLUMN);
        if !has_target {
            return Err(PredictorError::MissingTarget(TARGET_COLUMN.to_string()));
        }

        let distinct = distinct_labels(df.column(TARGET_COLUMN)?.as_materialized_series())?;
        if distinct != 2 {
            return Err(PredictorError::NonBinaryTarget {
                column: TARGET_COLUMN.to_string(),
                distinct,
            });
        }

        Ok(Self { name: name.into(), df })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    /// All column names in file order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Every column except `target`, in file order
    pub fn feature_columns(&self, target: &str) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|name| name != target)
            .collect()
    }

    /// Split the table into a row-major feature matrix and label vector.
    ///
    /// Returns the feature names alongside so the fitted model can check
    /// column order at prediction time.
    pub fn to_arrays(&self, target: &str) -> Result<(Vec<String>, Array2<f64>, Array1<f64>)> {
        let feature_cols = self.feature_columns(target);
        if feature_cols.is_empty() {
            return Err(PredictorError::DataError(
                "dataset has no feature columns besides the target".to_string(),
            ));
        }

        let y = Array1::from_vec(column_values(&self.df, target)?);

        let col_data = feature_cols
            .iter()
            .map(|name| column_values(&self.df, name))
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let n_rows = self.df.height();
        let x = Array2::from_shape_fn((n_rows, feature_cols.len()), |(r, c)| col_data[c][r]);

        Ok((feature_cols, x, y))
    }
}

/// Count distinct target values, ignoring nulls and float `NaN`
fn distinct_labels(column: &Series) -> Result<usize> {
    if !column.dtype().is_float() {
        return Ok(column.drop_nulls().n_unique()?);
    }

    let mut values: Vec<f64> = column
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    Ok(values.len())
}

/// Read one column as `f64`, rejecting missing or non-numeric cells
fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| PredictorError::DataError(format!("column '{}' not found", name)))?
        .as_materialized_series();

    let nulls_before = column.null_count();
    let as_f64 = column.cast(&DataType::Float64)?;
    if as_f64.null_count() > 0 {
        let reason = if nulls_before > 0 {
            "contains missing values"
        } else {
            "could not convert values to float"
        };
        return Err(PredictorError::DataError(format!("column '{}' {}", name, reason)));
    }

    Ok(as_f64.f64()?.into_no_null_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Min_Temp,Max_Temp,Leakage,Electricity,Fail_tomorrow\n\
                       10.0,20.0,0.1,220.0,0\n\
                       11.0,21.0,0.9,230.0,1\n\
                       12.0,22.0,0.2,225.0,0\n\
                       13.0,23.0,0.8,240.0,1\n";

    #[test]
    fn test_parse_valid_upload() {
        let dataset = Dataset::from_csv_upload("machines.csv", CSV.as_bytes()).unwrap();
        assert_eq!(dataset.height(), 4);
        assert_eq!(
            dataset.column_names(),
            vec!["Min_Temp", "Max_Temp", "Leakage", "Electricity", "Fail_tomorrow"]
        );
        assert_eq!(dataset.feature_columns(TARGET_COLUMN).len(), 4);
    }

    #[test]
    fn test_rejects_non_csv_extension() {
        let err = Dataset::from_csv_upload("machines.xlsx", CSV.as_bytes()).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidFileType(_)));
    }

    #[test]
    fn test_rejects_missing_target() {
        let csv = "Min_Temp,Max_Temp\n1.0,2.0\n3.0,4.0\n";
        let err = Dataset::from_csv_upload("machines.csv", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PredictorError::MissingTarget(_)));
    }

    #[test]
    fn test_rejects_single_and_multi_class_targets() {
        let single = "a,Fail_tomorrow\n1.0,0\n2.0,0\n";
        let err = Dataset::from_csv_upload("d.csv", single.as_bytes()).unwrap_err();
        assert!(matches!(err, PredictorError::NonBinaryTarget { distinct: 1, .. }));

        let triple = "a,Fail_tomorrow\n1.0,0\n2.0,1\n3.0,2\n";
        let err = Dataset::from_csv_upload("d.csv", triple.as_bytes()).unwrap_err();
        assert!(matches!(err, PredictorError::NonBinaryTarget { distinct: 3, .. }));
    }

    #[test]
    fn test_nan_target_values_are_not_a_class() {
        let csv = "a,Fail_tomorrow\n1.0,0.0\n2.0,1.0\n3.0,NaN\n";
        let dataset = Dataset::from_csv_upload("d.csv", csv.as_bytes()).unwrap();
        assert_eq!(dataset.height(), 3);

        let nan_only = "a,Fail_tomorrow\n1.0,0.0\n2.0,NaN\n";
        let err = Dataset::from_csv_upload("d.csv", nan_only.as_bytes()).unwrap_err();
        assert!(matches!(err, PredictorError::NonBinaryTarget { distinct: 1, .. }));
    }

    #[test]
    fn test_to_arrays_keeps_file_order() {
        let dataset = Dataset::from_csv_upload("machines.csv", CSV.as_bytes()).unwrap();
        let (names, x, y) = dataset.to_arrays(TARGET_COLUMN).unwrap();

        assert_eq!(names, vec!["Min_Temp", "Max_Temp", "Leakage", "Electricity"]);
        assert_eq!(x.dim(), (4, 4));
        assert_eq!(x[[1, 2]], 0.9);
        assert_eq!(y.to_vec(), vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_to_arrays_rejects_text_features() {
        let csv = "site,Fail_tomorrow\nnorth,0\nsouth,1\n";
        let dataset = Dataset::from_csv_upload("d.csv", csv.as_bytes()).unwrap();
        let err = dataset.to_arrays(TARGET_COLUMN).unwrap_err();
        assert!(err.to_string().contains("site"));
    }
}
