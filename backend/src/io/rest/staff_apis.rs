//! # REST API for Staff Profiles
//!
//! Admin only. The very first profile can be created without an
//! `X-Staff-Id` header so a fresh install can get its first admin.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::mappers::staff_mapper::StaffMapper;
use crate::io::rest::{acting_staff, error_response, staff_id};
use crate::AppState;
use shared::{CreateStaffRequest, StaffResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/staff", get(list_staff).post(create_staff))
}

pub async fn list_staff(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/staff");

    let actor = match acting_staff(&state, &headers).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match state.staff_service.list_staff(&actor).await {
        Ok(staff) => (StatusCode::OK, Json(StaffMapper::to_staff_list_dto(staff))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateStaffRequest>,
) -> impl IntoResponse {
    info!("POST /api/staff - request: {:?}", request);

    // No header at all is the bootstrap path; a bad header is still rejected
    let actor = match staff_id(&headers) {
        Some(_) => match acting_staff(&state, &headers).await {
            Ok(actor) => Some(actor),
            Err(response) => return response,
        },
        None => None,
    };

    match state
        .staff_service
        .create_staff(actor.as_ref(), StaffMapper::to_command(request))
        .await
    {
        Ok(staff) => {
            let success_message = format!("Staf {} berhasil dibuat", staff.name);
            (
                StatusCode::CREATED,
                Json(StaffResponse {
                    staff: StaffMapper::to_dto(staff),
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
