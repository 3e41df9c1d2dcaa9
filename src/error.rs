//! Error taxonomy for the search path

use thiserror::Error;

/// Errors surfaced by a search request
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// A request parameter could not be parsed or is out of range.
    /// Raised before any query is built.
    #[error("invalid parameter `{param}`: {message}")]
    Validation { param: String, message: String },

    /// The external index could not be reached.
    #[error("search index unavailable: {0}")]
    IndexUnavailable(String),

    /// The index rejected the query (unmapped field, bad value, missing index).
    #[error("search index rejected query: {reason}")]
    IndexQuery {
        field: Option<String>,
        reason: String,
    },
}

impl SearchError {
    pub fn validation(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            param: param.into(),
            message: message.into(),
        }
    }

    pub fn index_query(field: Option<String>, reason: impl Into<String>) -> Self {
        Self::IndexQuery {
            field,
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, used in error bodies and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::IndexUnavailable(_) => "index_unavailable",
            Self::IndexQuery { .. } => "index_query_error",
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::index_query(None, format!("malformed index response: {}", err))
        } else {
            Self::IndexUnavailable(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
