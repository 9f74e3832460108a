//! CSV Data Loader Module
//! Reads CSV files with Polars and turns them into typed datasets.

use crate::data::records::{Record, RecordError, Row};
use log::{debug, info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV is missing required column '{0}'")]
    MissingColumn(String),
    #[error("No data loaded")]
    NoData,
}

/// Immutable, shareable set of parsed records plus the rows that failed to parse.
pub struct Dataset<T> {
    records: Arc<[T]>,
    rejected: Arc<[RecordError]>,
}

impl<T> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            rejected: Arc::clone(&self.rejected),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Dataset<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("records", &self.records.len())
            .field("rejected", &self.rejected.len())
            .finish()
    }
}

impl<T> Dataset<T> {
    pub fn new(records: Vec<T>, rejected: Vec<RecordError>) -> Self {
        Self {
            records: records.into(),
            rejected: rejected.into(),
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn rejected(&self) -> &[RecordError] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read every column of a CSV file as strings.
pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    // Schema length 0 keeps every column as String; typing happens per record.
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;
    Ok(df)
}

/// Convert a DataFrame into one [`Row`] per line. Null cells are left out of the row.
pub fn dataframe_to_rows(df: &DataFrame) -> Result<Vec<Row>, LoaderError> {
    let mut rows: Vec<Row> = vec![Row::new(); df.height()];

    for column in df.get_columns() {
        let name = column.name().to_string();
        let as_text = column.as_materialized_series().cast(&DataType::String)?;
        let values = as_text.str()?;

        for (row, value) in rows.iter_mut().zip(values.into_iter()) {
            if let Some(v) = value {
                row.insert(name.clone(), v.to_string());
            }
        }
    }

    Ok(rows)
}

/// Parse rows into typed records after checking the header carries every required column.
pub fn parse_records<T: Record>(
    columns: &[String],
    rows: &[Row],
) -> Result<Dataset<T>, LoaderError> {
    if let Some(missing) = T::COLUMNS
        .iter()
        .find(|required| !columns.iter().any(|c| c == *required))
    {
        return Err(LoaderError::MissingColumn(missing.to_string()));
    }

    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        // Header is line 1
        match T::from_row(row, idx + 2) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!("rejected row: {}", e);
                rejected.push(e);
            }
        }
    }

    if !rejected.is_empty() {
        warn!(
            "{} of {} rows rejected; first: {}",
            rejected.len(),
            rows.len(),
            rejected[0]
        );
    }

    Ok(Dataset::new(records, rejected))
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        info!("loading {}", file_path.display());
        self.file_path = Some(file_path.to_path_buf());
        self.df = Some(read_csv(file_path)?);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Parse the loaded DataFrame into a typed dataset.
    pub fn to_dataset<T: Record>(&self) -> Result<Dataset<T>, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;
        let rows = dataframe_to_rows(df)?;
        let dataset = parse_records::<T>(&self.get_columns(), &rows)?;
        info!(
            "parsed {} of {} rows from {} ({} rejected)",
            dataset.len(),
            self.get_row_count(),
            self.get_file_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            dataset.rejected().len()
        );
        if dataset.is_empty() {
            warn!("no usable rows; every slide will be empty");
        }
        Ok(dataset)
    }
}

/// Load and parse a CSV file in one step.
pub fn load_dataset<T: Record>(path: &Path) -> Result<Dataset<T>, LoaderError> {
    let mut loader = DataLoader::new();
    loader.load_csv(path)?;
    loader.to_dataset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::{Paddle, Title};
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_titles_with_quoted_genre_lists() {
        let file = write_csv(
            "title,type,release_year,maturity_rating,genre\n\
             A,Movie,2019,PG,\"['Dramas', 'Comedies']\"\n\
             B,TV Show,2021,TV-MA,\"['Dramas']\"\n",
        );
        let dataset = load_dataset::<Title>(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.rejected().is_empty());
        assert_eq!(dataset.records()[0].genre, "['Dramas', 'Comedies']");
        assert_eq!(dataset.records()[1].kind, "TV Show");
        assert_eq!(dataset.records()[1].line, 3);
    }

    #[test]
    fn blank_rating_keeps_the_title() {
        let file = write_csv(
            "title,type,release_year,maturity_rating,genre\n\
             A,Movie,2019,PG,\"['Dramas']\"\n\
             B,Show,2020,,\"['Comedies']\"\n",
        );
        let dataset = load_dataset::<Title>(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.rejected().is_empty());
        assert_eq!(dataset.records()[0].maturity_rating.as_deref(), Some("PG"));
        assert_eq!(dataset.records()[1].maturity_rating, None);
    }

    #[test]
    fn missing_column_fails_the_load() {
        let file = write_csv("Paddle Name,Price\nVatic,99\n");
        let err = load_dataset::<Paddle>(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(c) if c == "Brand"));
    }

    #[test]
    fn malformed_rows_are_rejected_not_fatal() {
        let file = write_csv(
            "Paddle Name,Brand,Price\n\
             Vatic Pro,Vatic,$99.99\n\
             Mystery,Joola,call us\n\
             Perseus,Joola,250\n",
        );
        let dataset = load_dataset::<Paddle>(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rejected().len(), 1);
        assert_eq!(dataset.rejected()[0].line(), 3);
    }

    #[test]
    fn loader_reports_columns_and_rows() {
        let file = write_csv("Paddle Name,Brand,Price\nA,B,1\n");
        let mut loader = DataLoader::new();
        loader.load_csv(file.path()).unwrap();
        assert_eq!(loader.get_row_count(), 1);
        assert_eq!(loader.get_columns(), vec!["Paddle Name", "Brand", "Price"]);
        assert_eq!(loader.get_file_path().map(|p| p.as_path()), Some(file.path()));
    }

    #[test]
    fn all_rows_rejected_gives_empty_dataset() {
        let file = write_csv("Paddle Name,Brand,Price\nA,B,free\n");
        let dataset = load_dataset::<Paddle>(file.path()).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.rejected().len(), 1);
    }

    #[test]
    fn dataset_without_load_is_an_error() {
        let loader = DataLoader::new();
        assert!(matches!(
            loader.to_dataset::<Paddle>(),
            Err(LoaderError::NoData)
        ));
    }
}
