use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("No data: {0}")]
    NoData(String),

    #[error("Insufficient history: need {required} points, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl AnalysisError {
    /// True for transport-level failures (timeouts, HTTP errors, rate limits)
    /// as opposed to data that is genuinely absent or too short.
    pub fn is_transient(&self) -> bool {
        matches!(self, AnalysisError::ApiError(_))
    }
}
