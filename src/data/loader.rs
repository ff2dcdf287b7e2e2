//! CSV Data Loader Module
//! Reads a delimited source into raw string records using Polars.

use csv::ReaderBuilder;
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("{path} row {row}: expected {expected} fields, found {found}")]
    RaggedRow {
        path: PathBuf,
        row: u64,
        expected: u64,
        found: u64,
    },
    #[error("Malformed CSV {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Column `{column}` missing from {table}")]
    MissingColumn { table: String, column: String },
}

/// A single row: column name to raw string value. Empty string means "no value".
pub type RawRecord = HashMap<String, String>;

/// Rows of a CSV file in file order, before any type coercion.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with a parse error naming the first header that is not present.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), LoaderError> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(LoaderError::MissingColumn {
                table: self.name.clone(),
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row. Every column is read as a string.
    pub fn load_csv(file_path: &Path) -> Result<RawTable, LoaderError> {
        // Surface missing/unreadable files as I/O errors rather than parse errors
        File::open(file_path).map_err(|source| LoaderError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;

        Self::check_row_lengths(file_path)?;

        let csv_err = |source| LoaderError::Csv {
            path: file_path.to_path_buf(),
            source,
        };

        // Schema inference length 0 keeps every column as String
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(csv_err)?;

        Self::to_raw_table(Self::table_name(file_path), &df).map_err(csv_err)
    }

    /// Every row must have as many fields as the header. Polars pads short
    /// rows with nulls, so this is checked before the frame is built.
    fn check_row_lengths(file_path: &Path) -> Result<(), LoaderError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(file_path)
            .map_err(|source| LoaderError::Malformed {
                path: file_path.to_path_buf(),
                source,
            })?;

        for record in reader.byte_records() {
            if let Err(err) = record {
                return Err(match err.kind() {
                    csv::ErrorKind::UnequalLengths {
                        pos,
                        expected_len,
                        len,
                    } => LoaderError::RaggedRow {
                        path: file_path.to_path_buf(),
                        // Data rows are 1-based with the header excluded
                        row: pos.as_ref().map(|p| p.record()).unwrap_or_default(),
                        expected: *expected_len,
                        found: *len,
                    },
                    _ => LoaderError::Malformed {
                        path: file_path.to_path_buf(),
                        source: err,
                    },
                });
            }
        }
        Ok(())
    }

    fn table_name(file_path: &Path) -> String {
        file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string())
    }

    /// Convert a string-typed DataFrame into row-ordered field mappings.
    fn to_raw_table(name: String, df: &DataFrame) -> PolarsResult<RawTable> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut records: Vec<RawRecord> = (0..df.height())
            .map(|_| RawRecord::with_capacity(columns.len()))
            .collect();

        for column in &columns {
            let values = df.column(column)?.str()?;
            for (record, value) in records.iter_mut().zip(values.into_iter()) {
                record.insert(column.clone(), value.unwrap_or_default().to_string());
            }
        }

        Ok(RawTable {
            name,
            columns,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_preserves_row_order_and_blanks() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "enrollments.csv",
            "account_key,join_date,cancel_date\n448,2014-11-10,2015-01-14\n700,2014-11-11,\n12,2014-11-12,\n",
        );

        let table = DataLoader::load_csv(&path).unwrap();
        assert_eq!(table.name, "enrollments");
        assert_eq!(table.columns, vec!["account_key", "join_date", "cancel_date"]);
        assert_eq!(table.len(), 3);

        let keys: Vec<&str> = table
            .records
            .iter()
            .map(|r| r["account_key"].as_str())
            .collect();
        assert_eq!(keys, vec!["448", "700", "12"]);
        assert_eq!(table.records[0]["cancel_date"], "2015-01-14");
        assert_eq!(table.records[1]["cancel_date"], "");
    }

    #[test]
    fn test_load_keeps_numeric_looking_text_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "daily_engagement.csv",
            "acct,lessons_completed\n0,1.0\n1,0.0\n",
        );

        let table = DataLoader::load_csv(&path).unwrap();
        assert_eq!(table.records[0]["lessons_completed"], "1.0");
        assert_eq!(table.records[1]["acct"], "1");
    }

    #[test]
    fn test_load_supports_non_ascii_text() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "names.csv", "account_key,status\nç-1,été\n");

        let table = DataLoader::load_csv(&path).unwrap();
        assert_eq!(table.records[0]["account_key"], "ç-1");
        assert_eq!(table.records[0]["status"], "été");
    }

    #[test]
    fn test_header_only_file_is_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "empty.csv", "account_key,lesson_key\n");

        let table = DataLoader::load_csv(&path).unwrap();
        assert!(table.is_empty());
        assert!(table.has_column("lesson_key"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = DataLoader::load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "enrollments.csv",
            "account_key,status,join_date,cancel_date,days_to_cancel,is_udacity,is_canceled\n\
             2,current,2015-01-01,,,False,False\n\
             1,current,2015-01-01\n",
        );

        let err = DataLoader::load_csv(&path).unwrap_err();
        match err {
            LoaderError::RaggedRow {
                row, expected, found, ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 7);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_long_row_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "pairs.csv", "a,b\n1,2,3\n");

        let err = DataLoader::load_csv(&path).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::RaggedRow {
                row: 1,
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_quoted_commas_are_one_field() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "quoted.csv", "account_key,status\n1,\"on hold, pending\"\n");

        let table = DataLoader::load_csv(&path).unwrap();
        assert_eq!(table.records[0]["status"], "on hold, pending");
    }

    #[test]
    fn test_require_columns_reports_missing_header() {
        let table = RawTable {
            name: "project_submissions".to_string(),
            columns: vec!["account_key".to_string()],
            records: Vec::new(),
        };

        assert!(table.require_columns(&["account_key"]).is_ok());
        let err = table
            .require_columns(&["account_key", "lesson_key"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column `lesson_key` missing from project_submissions"
        );
    }
}
