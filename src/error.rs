//! Request-level error taxonomy.
//!
//! Every failed request surfaces as one of four kinds, each with a fixed
//! status code and client-facing message. The `detail` carried by a variant is
//! for logs only.

/// Error returned by catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriviaError {
    /// Requested entity, or a required non-empty result set, is absent.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Required input missing or invalid, or the quiz is exhausted.
    #[error("Unprocessable: {0}")]
    Unprocessable(String),
    /// Malformed input.
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// Unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TriviaError {
    /// Create an internal error from any store error, logging it.
    pub fn from_store<E: std::error::Error>(e: E) -> Self {
        tracing::error!(error = %e, "Question store failure");
        Self::Internal(e.to_string())
    }

    /// HTTP status code for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Unprocessable(_) => 422,
            Self::BadRequest(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Client-facing message for this error kind.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "couldn't find that resource",
            Self::Unprocessable(_) => "unprocessable",
            Self::BadRequest(_) => "bad request",
            Self::Internal(_) => "internal server error",
        }
    }

    /// Log-only detail.
    pub fn detail(&self) -> &str {
        match self {
            Self::NotFound(d) | Self::Unprocessable(d) | Self::BadRequest(d) | Self::Internal(d) => d.as_str(),
        }
    }
}
