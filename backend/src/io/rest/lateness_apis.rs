//! # REST API for the Lateness Calculator
//!
//! A pure preview: nothing is read from or written to storage.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::info;

use crate::domain::lateness::calculate_lateness_from_str;
use crate::io::rest::error_response;
use crate::AppState;
use shared::{LatenessRequest, LatenessResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/lateness", post(calculate))
}

pub async fn calculate(Json(request): Json<LatenessRequest>) -> impl IntoResponse {
    info!("POST /api/lateness - request: {:?}", request);

    match calculate_lateness_from_str(
        &request.start_time,
        &request.arrival_time,
        request.interval_minutes,
        request.penalty_per_interval,
    ) {
        Ok(outcome) => (
            StatusCode::OK,
            Json(LatenessResponse {
                is_late: outcome.is_late,
                late_minutes: outcome.late_minutes,
                point: outcome.point,
                note: outcome.note,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
