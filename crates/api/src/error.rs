//! API error type and its HTTP mapping.
//!
//! Store failures never reach the client verbatim: anything that is not a
//! missing row or a rejected request becomes a 500 with a fixed message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const DRIVER_NOT_FOUND: &str = "Conductor no encontrado";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Malformed input or an empty update (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The driver is absent or inactive (404).
    #[error("driver not found")]
    NotFound,

    /// Any other failure (500). Carries the client-facing message only.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Translate a repository error, using `message` as the 500 body.
    pub fn from_db(err: DbError, message: &'static str) -> Self {
        match err {
            DbError::NotFound => Self::NotFound,
            DbError::BadRequest(reason) => Self::BadRequest(reason.to_owned()),
            other => {
                error!(error = %other, "{message}");
                Self::Internal(message)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Self::BadRequest(reason) => reason,
            Self::NotFound => DRIVER_NOT_FOUND.to_owned(),
            Self::Internal(message) => message.to_owned(),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
