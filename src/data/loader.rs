//! CSV Data Loader Module
//! Handles sales CSV loading with ISO-8859-1 decoding using Polars.

use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Markers read as missing values, in addition to empty fields.
pub const NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Decode ISO-8859-1 bytes. Every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file, decoding it as ISO-8859-1 first.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let bytes = std::fs::read(file_path).map_err(|source| LoaderError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;
        debug!("Read {} bytes from {}", bytes.len(), file_path.display());

        let df = Self::parse_csv(&decode_latin1(&bytes))?;
        info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Parse already-decoded CSV text into a DataFrame.
    pub fn parse_csv(text: &str) -> Result<DataFrame, LoaderError> {
        let markers: Vec<PlSmallStr> = NULL_MARKERS.iter().map(|m| (*m).into()).collect();
        let null_values = NullValues::AllColumns(markers);

        // Scan the whole file for schema inference
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .map_parse_options(|opts| opts.with_null_values(Some(null_values.clone())))
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;

        Ok(df)
    }

    /// Column names of the loaded table, empty before a load.
    pub fn column_names(&self) -> Vec<String> {
        self.df.as_ref().map_or_else(Vec::new, |df| {
            df.get_column_names()
                .into_iter()
                .map(|name| name.to_string())
                .collect()
        })
    }

    pub fn row_count(&self) -> usize {
        self.df.as_ref().map_or(0, DataFrame::height)
    }

    /// Take ownership of the loaded DataFrame.
    pub fn take_dataframe(&mut self) -> Result<DataFrame, LoaderError> {
        self.df.take().ok_or(LoaderError::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_bytes_map_to_matching_code_points() {
        let decoded = decode_latin1(&[b'C', 0xE9, b'a', 0xFC]);
        assert_eq!(decoded, "Céaü");
    }

    #[test]
    fn null_markers_become_nulls() {
        let df = DataLoader::parse_csv("SALES,CITY\n10.5,Paris\nNA,\nnan,NULL\n").unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("SALES").unwrap().null_count(), 2);
        assert_eq!(df.column("CITY").unwrap().null_count(), 2);
    }

    #[test]
    fn null_markers_apply_to_numeric_and_text_columns() {
        let text = "QUANTITYORDERED,STATUS,SALES\n#N/A,None,<NA>\n30,Shipped,2871\n";
        let df = DataLoader::parse_csv(text).unwrap();
        assert_eq!(df.height(), 2);
        for name in ["QUANTITYORDERED", "STATUS", "SALES"] {
            assert_eq!(df.column(name).unwrap().null_count(), 1, "{name}");
        }
        assert!(crate::data::is_numeric_dtype(df.column("SALES").unwrap().dtype()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut loader = DataLoader::new();
        let err = loader
            .load_csv(Path::new("definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
        assert_eq!(loader.row_count(), 0);
        assert!(loader.column_names().is_empty());
        assert!(loader.take_dataframe().is_err());
    }

    #[test]
    fn loads_latin1_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        let mut bytes = b"CUSTOMERNAME,SALES\n".to_vec();
        bytes.extend_from_slice(&[b'M', 0xFC, b'l', b'l', b'e', b'r']);
        bytes.extend_from_slice(b",100\n");
        std::fs::write(&path, bytes).unwrap();

        let mut loader = DataLoader::new();
        loader.load_csv(&path).unwrap();
        assert_eq!(loader.row_count(), 1);
        assert_eq!(loader.column_names(), vec!["CUSTOMERNAME", "SALES"]);

        let df = loader.take_dataframe().unwrap();
        let names = df.column("CUSTOMERNAME").unwrap().str().unwrap().get(0);
        assert_eq!(names, Some("Müller"));
    }
}
