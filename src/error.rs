use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source '{source_name}' is missing required column '{column}'")]
    MalformedSource { source_name: String, column: String },

    #[error("Failed to parse value: {0}")]
    Parse(String),

    #[error("Unknown category '{category}' in column '{column}'")]
    UnknownCategory { column: String, category: String },

    #[error("Transformer state not found: {0}")]
    StateNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn malformed_source(source_name: &str, column: &str) -> Self {
        Error::MalformedSource {
            source_name: source_name.to_string(),
            column: column.to_string(),
        }
    }

    /// Errors caused by the shape or content of the input data, as opposed
    /// to the environment the pipeline runs in.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedSource { .. } | Error::Parse(_) | Error::UnknownCategory { .. }
        )
    }
}
