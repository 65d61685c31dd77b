use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// The two failure classes a pipeline run can end with.
///
/// Both are fatal: the run is reported and terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreadable input or unwritable output.
    FileAccess,
    /// Malformed rows, missing columns, or values that cannot be parsed.
    Parse,
}

/// Error type returned by loading, aggregation and export.
///
/// This is a single error enum shared across every stage of the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A file or directory could not be opened, read, or written.
    #[error("cannot access '{}': {}", .path.display(), .source)]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader/writer error (unequal row lengths, invalid UTF-8, underlying I/O).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not have the expected shape (missing required columns, wrong column type).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A Polars query over the loaded table failed.
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// The configuration file is malformed.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl PipelineError {
    /// Attach `path` to an I/O error.
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Classify this error as either a file access or a parse failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileAccess { .. } => ErrorKind::FileAccess,
            Self::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ErrorKind::FileAccess,
                _ => ErrorKind::Parse,
            },
            Self::SchemaMismatch { .. }
            | Self::ParseError { .. }
            | Self::Polars(_)
            | Self::Config { .. } => ErrorKind::Parse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, PipelineError};

    #[test]
    fn io_errors_classify_as_file_access() {
        let err = PipelineError::file_access(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.kind(), ErrorKind::FileAccess);
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn unequal_row_lengths_classify_as_parse() {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader("a,b\n1,2,3\n".as_bytes());
        let csv_err = rdr.records().next().unwrap().unwrap_err();
        let err = PipelineError::from(csv_err);
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn schema_and_config_errors_classify_as_parse() {
        let err = PipelineError::SchemaMismatch {
            message: "missing column".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Parse);
        let err = PipelineError::Config {
            message: "bad toml".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
