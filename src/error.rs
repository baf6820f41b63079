use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    services::{booking::BookingError, schedule::ScheduleError},
    store::StoreError,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised by the service layer. Handlers turn them into the
/// `{ "error": ... }` JSON body with the matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Access denied")]
    Forbidden,

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Store(StoreError),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Schedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Booking(e) => e.status(),
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Store(other),
        }
    }
}

impl From<ApiError> for (StatusCode, Json<Value>) {
    fn from(err: ApiError) -> Self {
        let status = err.status();
        if status.is_server_error() {
            tracing::error!("request failed: {err}");
            return (status, Json(json!({ "error": "Internal server error" })));
        }
        (status, Json(json!({ "error": err.to_string() })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_meaning() {
        assert_eq!(ApiError::from(StoreError::NotFound("Customer")).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(StoreError::Conflict("dup".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::Other(anyhow::anyhow!("boom"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_are_not_leaked() {
        let (status, Json(body)) =
            <(StatusCode, Json<Value>)>::from(ApiError::Store(StoreError::Other(anyhow::anyhow!("secret dsn"))));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
