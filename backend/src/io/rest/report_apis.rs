//! # REST API for Report Exports
//!
//! File downloads: CSV for spreadsheets, PDF per class.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::errors::PointError;
use crate::domain::report_service::ExportFile;
use crate::io::rest::error_response;
use crate::io::rest::mappers::record_mapper::RecordMapper;
use crate::AppState;
use shared::RecordsQuery;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports/export.csv", get(export_csv))
        .route("/reports/export.pdf", get(export_pdf))
}

fn download(file: ExportFile) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response()
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> impl IntoResponse {
    info!("GET /api/reports/export.csv - query: {:?}", query);

    let filter = match RecordMapper::to_filter(query) {
        Ok(filter) => filter,
        Err(e) => return error_response(e),
    };

    match state.report_service.export_csv(&filter).await {
        Ok(file) => download(file),
        Err(e) => error_response(e),
    }
}

/// Requires `class_id`
pub async fn export_pdf(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> impl IntoResponse {
    info!("GET /api/reports/export.pdf - query: {:?}", query);

    let filter = match RecordMapper::to_filter(query) {
        Ok(filter) => filter,
        Err(e) => return error_response(e),
    };
    let class_id = match filter.class_id.clone() {
        Some(class_id) => class_id,
        None => return error_response(PointError::invalid("class_id is required for a PDF report")),
    };

    match state.report_service.export_pdf(&class_id, &filter).await {
        Ok(file) => download(file),
        Err(e) => error_response(e),
    }
}
