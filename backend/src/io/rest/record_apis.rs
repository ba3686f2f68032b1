//! # REST API for Point Recording
//!
//! Scans from the QR reader, manual batch entry and the administrative bulk
//! delete. Listing lives here too since it shares the `/records` path.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::info;

use crate::io::rest::mappers::record_mapper::RecordMapper;
use crate::io::rest::{acting_staff, error_response};
use crate::AppState;
use shared::{
    CreateRecordsRequest, DeleteRecordsRequest, DeleteRecordsResponse, RecordsQuery, ScanRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan", post(scan))
        .route(
            "/records",
            post(create_records).get(list_records).delete(delete_records),
        )
}

/// Record one scan: categorized when an aspect and rule are selected,
/// otherwise an attendance entry scored by the lateness calculator
pub async fn scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ScanRequest>,
) -> impl IntoResponse {
    info!("POST /api/scan - request: {:?}", request);

    let actor = match acting_staff(&state, &headers).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    let command = match RecordMapper::to_scan_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e),
    };

    match state.record_service.record_scan(&actor, command).await {
        Ok(result) => {
            (StatusCode::CREATED, Json(RecordMapper::to_scan_dto(result))).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn create_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateRecordsRequest>,
) -> impl IntoResponse {
    info!("POST /api/records - request: {:?}", request);

    let actor = match acting_staff(&state, &headers).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    let command = match RecordMapper::to_create_records_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e),
    };

    match state.record_service.create_records(&actor, command).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(RecordMapper::to_create_records_dto(result)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> impl IntoResponse {
    info!("GET /api/records - query: {:?}", query);

    let filter = match RecordMapper::to_filter(query) {
        Ok(filter) => filter,
        Err(e) => return error_response(e),
    };

    match state.report_service.list_records(&filter).await {
        Ok(records) => {
            (StatusCode::OK, Json(RecordMapper::to_record_list_dto(records))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Admin and principal only
pub async fn delete_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteRecordsRequest>,
) -> impl IntoResponse {
    info!("DELETE /api/records - request: {:?}", request);

    let actor = match acting_staff(&state, &headers).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    let command = match RecordMapper::to_delete_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e),
    };

    match state.report_service.delete_records(&actor, command).await {
        Ok(deleted_count) => (
            StatusCode::OK,
            Json(DeleteRecordsResponse {
                success: true,
                deleted_count,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
