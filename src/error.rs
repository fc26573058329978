use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::order::OrderStatus;

/// Validation failures reported by the store. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid status: {0:?}")]
    InvalidStatus(String),

    #[error("illegal transition from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("driver {0} not found")]
    DriverNotFound(String),

    #[error("order {0} not found")]
    OrderNotFound(String),

    #[error("order {0} is already assigned")]
    OrderAlreadyAssigned(String),

    #[error("driver {0} is not available")]
    DriverUnavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::DriverNotFound(_) | StoreError::OrderNotFound(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            return AppError::NotFound(err.to_string());
        }

        match &err {
            StoreError::MissingField(_) | StoreError::InvalidStatus(_) => {
                AppError::BadRequest(err.to_string())
            }
            _ => AppError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::{AppError, StoreError};
    use crate::models::order::OrderStatus;

    fn status_of(err: StoreError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn store_errors_map_to_http_status_codes() {
        assert_eq!(status_of(StoreError::MissingField("id")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(StoreError::InvalidStatus("flying".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(StoreError::OrderNotFound("o1".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(StoreError::IllegalTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Canceled,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(StoreError::DriverNotFound("d1".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(StoreError::DriverUnavailable("d1".to_string())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn not_found_groups_both_entities() {
        assert!(StoreError::DriverNotFound("d1".to_string()).is_not_found());
        assert!(StoreError::OrderNotFound("o1".to_string()).is_not_found());
        assert!(!StoreError::OrderAlreadyAssigned("o1".to_string()).is_not_found());
    }
}
