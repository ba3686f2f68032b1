//! # REST API for Settings
//!
//! Reading the attendance policy and, for admins, changing it.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use tracing::info;

use crate::io::rest::mappers::settings_mapper::SettingsMapper;
use crate::io::rest::{acting_staff, error_response};
use crate::AppState;
use shared::{UpdateSettingRequest, UpdateSettingsRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list_settings).put(update_settings))
        .route("/settings/resolved", get(get_resolved_settings))
        .route("/settings/:key", put(update_setting))
}

/// Stored settings rows
pub async fn list_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings");

    match state.settings_service.list_settings().await {
        Ok(entries) => {
            (StatusCode::OK, Json(SettingsMapper::to_setting_list_dto(entries))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// The policy the next scan will use, defaults included
pub async fn get_resolved_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings/resolved");

    match state.settings_service.resolve().await {
        Ok(settings) => {
            (StatusCode::OK, Json(SettingsMapper::to_resolved_dto(settings))).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn update_setting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(request): Json<UpdateSettingRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings/{} - request: {:?}", key, request);

    let actor = match acting_staff(&state, &headers).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match state
        .settings_service
        .update_setting(&actor, &key, &request.value)
        .await
    {
        Ok(entry) => (StatusCode::OK, Json(SettingsMapper::to_dto(entry))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings - request: {:?}", request);

    let actor = match acting_staff(&state, &headers).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match state
        .settings_service
        .update_settings(&actor, &request.settings)
        .await
    {
        Ok(entries) => {
            (StatusCode::OK, Json(SettingsMapper::to_setting_list_dto(entries))).into_response()
        }
        Err(e) => error_response(e),
    }
}
