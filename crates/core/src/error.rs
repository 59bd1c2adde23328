use thiserror::Error;

/// Errors shared by the assistant pipeline
#[derive(Debug, Error)]
pub enum MedbotError {
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for MedbotError {
    fn from(err: csv::Error) -> Self {
        MedbotError::Dataset(err.to_string())
    }
}

/// Convenience alias used across the workspace
pub type Result<T> = std::result::Result<T, MedbotError>;
