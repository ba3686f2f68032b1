//! # REST API for the Dashboard

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::today;
use crate::io::rest::{acting_staff, error_response};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// Statistics scoped to the acting staff member's role
pub async fn get_dashboard(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/dashboard");

    let actor = match acting_staff(&state, &headers).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match state.dashboard_service.stats(&actor, today()).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(e),
    }
}
