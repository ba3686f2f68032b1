//! # REST API for Class Management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use tracing::info;

use crate::io::rest::error_response;
use crate::io::rest::mappers::class_mapper::ClassMapper;
use crate::AppState;
use shared::{ClassResponse, CreateClassRequest, SuccessResponse, UpdateClassRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes).post(create_class))
        .route("/classes/:id", put(update_class).delete(delete_class))
}

pub async fn list_classes(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/classes");

    match state.class_service.list_classes().await {
        Ok(classes) => {
            (StatusCode::OK, Json(ClassMapper::to_class_list_dto(classes))).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn create_class(
    State(state): State<AppState>,
    Json(request): Json<CreateClassRequest>,
) -> impl IntoResponse {
    info!("POST /api/classes - request: {:?}", request);

    match state
        .class_service
        .create_class(ClassMapper::to_create_command(request))
        .await
    {
        Ok(class) => {
            let success_message = format!("Kelas {} berhasil dibuat", class.name);
            (
                StatusCode::CREATED,
                Json(ClassResponse {
                    class: ClassMapper::to_dto(class),
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn update_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(request): Json<UpdateClassRequest>,
) -> impl IntoResponse {
    info!("PUT /api/classes/{} - request: {:?}", class_id, request);

    match state
        .class_service
        .update_class(&class_id, ClassMapper::to_update_command(request))
        .await
    {
        Ok(class) => {
            let success_message = format!("Kelas {} berhasil diperbarui", class.name);
            (
                StatusCode::OK,
                Json(ClassResponse {
                    class: ClassMapper::to_dto(class),
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn delete_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/classes/{}", class_id);

    match state.class_service.delete_class(&class_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SuccessResponse {
                success: true,
                message: "Kelas berhasil dihapus".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
