// ==========================================
// Link Marketplace - Import Error Types
// ==========================================
// Fatal/input errors that abort a whole parse/preview call.
// Row-level problems are ValidationError entries, not ImportError.
// ==========================================

use thiserror::Error;

/// Import pipeline error
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("unsupported file type: {0} (expected .csv, .xlsx, .xls, .xlsm or .ods)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("spreadsheet parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("dataset is empty: a header row and at least one data row are required")]
    EmptyDataset,

    // ===== Mapping errors =====
    #[error("malformed column mapping: {0}")]
    MalformedMapping(String),

    // ===== Normalization errors =====
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    // ===== Database errors =====
    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    // ===== Config errors =====
    #[error("config read failed (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("config value invalid (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== Generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::DatabaseQueryError(err.to_string())
    }
}

impl From<crate::repository::RepositoryError> for ImportError {
    fn from(err: crate::repository::RepositoryError) -> Self {
        ImportError::DatabaseQueryError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
