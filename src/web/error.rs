//! HTTP mapping for search errors

use crate::error::SearchError;
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl SearchError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::IndexUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::IndexQuery { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for SearchError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation("query", rejection.body_text())
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Search request failed: {}", self);
        }

        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        match &self {
            Self::Validation { param, .. } => body["param"] = json!(param),
            Self::IndexQuery {
                field: Some(field), ..
            } => body["field"] = json!(field),
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}
