//! # REST API Interface Layer
//!
//! HTTP endpoints under `/api`. Each `*_apis` module exposes a `router()`
//! that `create_router` nests; handlers map requests onto domain commands,
//! call one service and translate the outcome with [`error::error_response`].
//!
//! The acting staff member is identified by the `X-Staff-Id` header.

pub mod aspect_apis;
pub mod class_apis;
pub mod dashboard_apis;
pub mod error;
pub mod lateness_apis;
pub mod mappers;
pub mod record_apis;
pub mod report_apis;
pub mod settings_apis;
pub mod staff_apis;
pub mod student_apis;

use axum::http::HeaderMap;
use axum::response::Response;

use crate::domain::models::staff::Staff;
use crate::AppState;

pub use error::error_response;

pub const STAFF_ID_HEADER: &str = "x-staff-id";

/// Raw `X-Staff-Id` value, if present and valid UTF-8
pub fn staff_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(STAFF_ID_HEADER).and_then(|v| v.to_str().ok())
}

/// Resolve the acting staff member or produce the error response to return
pub async fn acting_staff(state: &AppState, headers: &HeaderMap) -> Result<Staff, Response> {
    state
        .staff_service
        .resolve_actor(staff_id(headers))
        .await
        .map_err(error_response)
}
