use thiserror::Error;

/// Failures raised inside a pipeline stage. Stage boundaries log these and
/// degrade to "no data" instead of propagating them further.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("HTTP {status}: {preview}")]
    Status { status: u16, preview: String },

    #[error("Non-JSON response: {0}")]
    NonJsonResponse(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty payload from {0}")]
    EmptyPayload(&'static str),

    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Mail error: {0}")]
    Mail(String),
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzerError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::Parse(err.to_string())
    }
}

impl From<lettre::error::Error> for AnalyzerError {
    fn from(err: lettre::error::Error) -> Self {
        AnalyzerError::Mail(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for AnalyzerError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        AnalyzerError::Mail(err.to_string())
    }
}

impl From<lettre::address::AddressError> for AnalyzerError {
    fn from(err: lettre::address::AddressError) -> Self {
        AnalyzerError::Mail(err.to_string())
    }
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
