use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{source_name} request failed: {message}")]
    SourceError { source_name: String, message: String },

    #[error("No auth token stored for user {0}")]
    MissingAuthToken(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Score calculation error: {0}")]
    ScoreCalculationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for ScoreError {
    fn from(err: config::ConfigError) -> Self {
        ScoreError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
