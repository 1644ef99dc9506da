//! Error types for deciframe-api
//!
//! Every failure of a similarity request falls in one of three classes.
//! Responses never carry an error body; details go to the log only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Similarity request errors
#[derive(Error, Debug)]
pub enum SearchError {
    /// Malformed request parameter (page number, query string)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Referenced song does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage, serialization or other server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SearchError::NotFound(_) => StatusCode::NOT_FOUND,
            SearchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl From<deciframe_common::Error> for SearchError {
    fn from(err: deciframe_common::Error) -> Self {
        use deciframe_common::Error;

        match err {
            Error::NotFound(what) => SearchError::NotFound(what),
            Error::InvalidInput(msg) => SearchError::BadRequest(msg),
            other => SearchError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

/// Convenience Result type for request handling
pub type Result<T> = std::result::Result<T, SearchError>;
