//! # REST API for Aspects and Rules

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use tracing::info;

use crate::io::rest::error_response;
use crate::io::rest::mappers::aspect_mapper::AspectMapper;
use crate::AppState;
use shared::{
    AspectResponse, CreateAspectRequest, CreateRuleRequest, RuleResponse, SuccessResponse,
    UpdateAspectRequest, UpdateRuleRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/aspects", get(list_aspects).post(create_aspect))
        .route("/aspects/:id", put(update_aspect).delete(delete_aspect))
        .route("/aspects/:id/rules", post(create_rule))
        .route("/rules/:id", put(update_rule).delete(delete_rule))
}

pub async fn list_aspects(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/aspects");

    match state.aspect_service.list_aspects().await {
        Ok(aspects) => {
            (StatusCode::OK, Json(AspectMapper::to_aspect_list_dto(aspects))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Create an aspect, optionally with its first rule
pub async fn create_aspect(
    State(state): State<AppState>,
    Json(request): Json<CreateAspectRequest>,
) -> impl IntoResponse {
    info!("POST /api/aspects - request: {:?}", request);

    let (command, initial_rule) = match AspectMapper::to_create_commands(request) {
        Ok(commands) => commands,
        Err(e) => return error_response(e),
    };

    match state.aspect_service.create_aspect(command, initial_rule).await {
        Ok(aspect) => {
            let success_message = format!("Aspek {} berhasil dibuat", aspect.aspect.name);
            (
                StatusCode::CREATED,
                Json(AspectResponse {
                    aspect: AspectMapper::to_dto(aspect),
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn update_aspect(
    State(state): State<AppState>,
    Path(aspect_id): Path<String>,
    Json(request): Json<UpdateAspectRequest>,
) -> impl IntoResponse {
    info!("PUT /api/aspects/{} - request: {:?}", aspect_id, request);

    match state
        .aspect_service
        .update_aspect(&aspect_id, AspectMapper::to_update_command(request))
        .await
    {
        Ok(aspect) => {
            let success_message = format!("Aspek {} berhasil diperbarui", aspect.aspect.name);
            (
                StatusCode::OK,
                Json(AspectResponse {
                    aspect: AspectMapper::to_dto(aspect),
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Deletes the aspect's rules too
pub async fn delete_aspect(
    State(state): State<AppState>,
    Path(aspect_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/aspects/{}", aspect_id);

    match state.aspect_service.delete_aspect(&aspect_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SuccessResponse {
                success: true,
                message: "Aspek berhasil dihapus".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create_rule(
    State(state): State<AppState>,
    Path(aspect_id): Path<String>,
    Json(request): Json<CreateRuleRequest>,
) -> impl IntoResponse {
    info!("POST /api/aspects/{}/rules - request: {:?}", aspect_id, request);

    match state
        .aspect_service
        .create_rule(&aspect_id, AspectMapper::to_create_rule_command(request))
        .await
    {
        Ok(rule) => {
            let success_message = format!("Aturan {} berhasil dibuat", rule.name);
            (
                StatusCode::CREATED,
                Json(RuleResponse {
                    rule: AspectMapper::to_rule_dto(rule),
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn update_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<String>,
    Json(request): Json<UpdateRuleRequest>,
) -> impl IntoResponse {
    info!("PUT /api/rules/{} - request: {:?}", rule_id, request);

    match state
        .aspect_service
        .update_rule(&rule_id, AspectMapper::to_update_rule_command(request))
        .await
    {
        Ok(rule) => {
            let success_message = format!("Aturan {} berhasil diperbarui", rule.name);
            (
                StatusCode::OK,
                Json(RuleResponse {
                    rule: AspectMapper::to_rule_dto(rule),
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn delete_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/rules/{}", rule_id);

    match state.aspect_service.delete_rule(&rule_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SuccessResponse {
                success: true,
                message: "Aturan berhasil dihapus".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
