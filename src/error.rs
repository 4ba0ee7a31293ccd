use thiserror::Error;

#[derive(Error, Debug)]
pub enum MentorError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Dataset error: {0}")]
    SchemaError(String),
    #[error("Explanation error: {0}")]
    ExplainError(#[from] ExplainError),
    #[error("Transport error: {0}")]
    TransportError(String),
}

/// Failures of a single completion call. None of them are retried.
#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, MentorError>;
