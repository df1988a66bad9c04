use crate::domain::result::ErrorInfo;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid validation rule for {code}/{field}: {source}")]
    InvalidRule {
        code: String,
        field: String,
        #[source]
        source: regex::Error,
    },
    #[error("Operation error: {0}")]
    OperationError(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Failure reported by a session loader or operation submitter.
///
/// The presenter turns every variant into exactly one view emission; none of
/// them travel further up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// The remote end could not be reached. Retryable once the user agrees.
    #[error("Connection error: {0}")]
    Connectivity(String),
    /// The server answered with an error outcome of its own.
    #[error("Remote error: {}", .0.result_info)]
    Remote(ErrorInfo),
    /// The host wired something up wrong, e.g. an operation URL the list does not know.
    #[error("Integration error: {0}")]
    Integration(String),
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl FlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::Connectivity(_) => ErrorKind::Connectivity,
            FlowError::Remote(_) => ErrorKind::Remote,
            FlowError::Integration(_) => ErrorKind::Integration,
            FlowError::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Connectivity,
    Remote,
    Integration,
    Unknown,
}
