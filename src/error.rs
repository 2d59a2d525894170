use thiserror::Error;

/// Failures of a single REST call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Connection refused, timeout, or any other transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response, carrying whatever message the server provided.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Local image could not be read, or the upload endpoint refused it.
    #[error("image upload failed: {0}")]
    Upload(String),
}

impl ApiError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// The statistics text is not a flat JSON object of numbers.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("statistics must be a JSON object of numbers: {reason}")]
pub struct StatisticsFormatError {
    pub reason: String,
}

/// Local checks run before any network call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a number (got {value:?})")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be a date as YYYY-MM-DD (got {value:?})")]
    InvalidDate { field: &'static str, value: String },

    #[error("sell-on percentage must be between 0 and 100 (got {0})")]
    PercentageOutOfRange(f64),

    #[error(transparent)]
    Statistics(#[from] StatisticsFormatError),
}

/// Errors surfaced by a form controller at its submit/load boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    Busy,

    /// The form is still loading or failed to load.
    #[error("form is not ready for editing")]
    NotEditable,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
