//! # REST API for Student Management
//!
//! CRUD plus bulk delete and bulk import.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::io::rest::error_response;
use crate::io::rest::mappers::non_blank;
use crate::io::rest::mappers::student_mapper::StudentMapper;
use crate::AppState;
use shared::{
    BulkDeleteStudentsRequest, BulkStudentsResponse, CreateStudentRequest, ImportStudentsRequest,
    StudentListQuery, StudentResponse, SuccessResponse, UpdateStudentRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/bulk-delete", post(delete_students))
        .route("/students/import", post(import_students))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

/// All students, or one class with `?class_id=`
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> impl IntoResponse {
    info!("GET /api/students - query: {:?}", query);

    let class_id = non_blank(query.class_id);
    match state.student_service.list_students(class_id.as_deref()).await {
        Ok(students) => {
            (StatusCode::OK, Json(StudentMapper::to_student_list_dto(students))).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/students/{}", student_id);

    match state.student_service.get_student(&student_id).await {
        Ok(student) => (StatusCode::OK, Json(StudentMapper::to_dto(student))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students - request: {:?}", request);

    match state
        .student_service
        .create_student(StudentMapper::to_create_command(request))
        .await
    {
        Ok(student) => {
            let success_message = format!("Siswa {} berhasil ditambahkan", student.name);
            (
                StatusCode::CREATED,
                Json(StudentResponse {
                    student: StudentMapper::to_dto(student),
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<UpdateStudentRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/{} - request: {:?}", student_id, request);

    match state
        .student_service
        .update_student(&student_id, StudentMapper::to_update_command(request))
        .await
    {
        Ok(student) => {
            let success_message = format!("Siswa {} berhasil diperbarui", student.name);
            (
                StatusCode::OK,
                Json(StudentResponse {
                    student: StudentMapper::to_dto(student),
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/students/{}", student_id);

    match state.student_service.delete_student(&student_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SuccessResponse {
                success: true,
                message: "Siswa berhasil dihapus".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_students(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteStudentsRequest>,
) -> impl IntoResponse {
    info!("POST /api/students/bulk-delete - {} ids", request.student_ids.len());

    match state.student_service.delete_students(&request.student_ids).await {
        Ok(deleted) => (
            StatusCode::OK,
            Json(BulkStudentsResponse {
                affected_count: deleted as usize,
                success_message: format!("{} siswa berhasil dihapus", deleted),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// All rows or none
pub async fn import_students(
    State(state): State<AppState>,
    Json(request): Json<ImportStudentsRequest>,
) -> impl IntoResponse {
    info!("POST /api/students/import - {} rows", request.students.len());

    let commands = request
        .students
        .into_iter()
        .map(StudentMapper::to_create_command)
        .collect();
    match state.student_service.import_students(commands).await {
        Ok(imported) => (
            StatusCode::CREATED,
            Json(BulkStudentsResponse {
                affected_count: imported,
                success_message: format!("{} siswa berhasil diimpor", imported),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
