use thiserror::Error;

#[derive(Error, Debug)]
pub enum FpaError {
    #[error("Invalid period key '{0}': expected YYYY-MM or YYYY-Qn")]
    InvalidPeriod(String),

    #[error("Unknown measure: {0}")]
    UnknownMeasure(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Row {row} could not be ingested: {details}")]
    Ingestion { row: usize, details: String },

    #[error("Invalid dashboard configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "assistant")]
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[cfg(feature = "assistant")]
    #[error("Assistant failed: {0}")]
    AssistantFailed(String),
}

pub type Result<T> = std::result::Result<T, FpaError>;
