use thiserror::Error;

/// Reasons a dataset cannot be loaded. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: column '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("dataset contains no launch records")]
    Empty,
}
