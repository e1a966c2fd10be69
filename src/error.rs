//! Application error taxonomy.
//!
//! Every handler returns `Result<_, ApiError>`; this type is the single
//! terminal translation layer that turns failures into the JSON envelope
//! `{"message": ..., "stack": ...}`. The `stack` field carries the debug
//! representation in debug builds only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid coupon code")]
    InvalidCoupon,
    #[error("this page does not exist")]
    OutOfRange,
    #[error("upstream failure: {0}")]
    Upstream(String),
    #[error("storage failure")]
    Store(#[from] StoreError),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidCoupon | Self::OutOfRange => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    stack: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        let stack = if cfg!(debug_assertions) { Some(format!("{self:?}")) } else { None };
        let body = ErrorBody { message: self.to_string(), stack };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ApiError::validation("bad id").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("no token").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("product").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidCoupon.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::OutOfRange.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("exists".into()).status(), StatusCode::CONFLICT);
    }
}
