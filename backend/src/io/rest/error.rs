//! Translation of domain failures into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::errors::PointError;

pub fn status_for(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<PointError>() {
        Some(PointError::NotFound { .. }) => StatusCode::NOT_FOUND,
        Some(PointError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
        Some(PointError::Unauthorized(_)) => StatusCode::FORBIDDEN,
        Some(PointError::Persistence(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `{ "error": message }` with the status matching the failure category
pub fn error_response(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    let status = status_for(&err);
    if status.is_server_error() {
        error!("Request failed: {:?}", err);
    } else {
        warn!("Request rejected ({}): {}", status, err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_per_category() {
        let cases: [(anyhow::Error, StatusCode); 5] = [
            (PointError::not_found("Student", "x").into(), StatusCode::NOT_FOUND),
            (PointError::invalid("bad").into(), StatusCode::BAD_REQUEST),
            (PointError::Unauthorized("no".into()).into(), StatusCode::FORBIDDEN),
            (PointError::persistence("down").into(), StatusCode::INTERNAL_SERVER_ERROR),
            (anyhow::anyhow!("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err), status);
        }
    }

    #[test]
    fn test_wrapped_errors_keep_category() {
        let err = anyhow::Error::from(PointError::invalid("bad")).context("while importing");
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }
}
