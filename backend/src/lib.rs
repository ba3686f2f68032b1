//! # Poin Backend
//!
//! School point tracking: attendance scans scored by the lateness
//! calculator, rule-based behavior records, reports and dashboards.
//!
//! ## Architecture
//!
//! ```text
//! io::rest     axum handlers, DTO mappers, error translation
//!     ↓
//! domain       services, calculators, commands, models
//!     ↓
//! storage      Connection + repository traits, SQLite implementation
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderName, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::aspect_service::AspectService;
use crate::domain::class_service::ClassService;
use crate::domain::dashboard_service::DashboardService;
use crate::domain::record_service::RecordService;
use crate::domain::report_service::ReportService;
use crate::domain::settings_service::SettingsService;
use crate::domain::staff_service::StaffService;
use crate::domain::student_service::StudentService;
use crate::storage::DbConnection;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub settings_service: SettingsService<DbConnection>,
    pub record_service: RecordService<DbConnection>,
    pub report_service: ReportService<DbConnection>,
    pub dashboard_service: DashboardService<DbConnection>,
    pub class_service: ClassService<DbConnection>,
    pub student_service: StudentService<DbConnection>,
    pub aspect_service: AspectService<DbConnection>,
    pub staff_service: StaffService<DbConnection>,
}

impl AppState {
    pub fn new(connection: Arc<DbConnection>) -> Self {
        let settings_service = SettingsService::new(connection.clone());
        Self {
            record_service: RecordService::new(connection.clone(), settings_service.clone()),
            settings_service,
            report_service: ReportService::new(connection.clone()),
            dashboard_service: DashboardService::new(connection.clone()),
            class_service: ClassService::new(connection.clone()),
            student_service: StudentService::new(connection.clone()),
            aspect_service: AspectService::new(connection.clone()),
            staff_service: StaffService::new(connection),
        }
    }
}

/// Open the database and wire up the services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let connection = DbConnection::new(&config.database_url).await?;

    info!("Setting up application state");
    Ok(AppState::new(Arc::new(connection)))
}

/// The full router: every API under `/api`, with CORS and request tracing
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(cors_origin)
        .with_context(|| format!("Invalid CORS origin '{}'", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("content-disposition")]);

    let api_routes = Router::new()
        .merge(io::rest::settings_apis::router())
        .merge(io::rest::record_apis::router())
        .merge(io::rest::report_apis::router())
        .merge(io::rest::dashboard_apis::router())
        .merge(io::rest::class_apis::router())
        .merge(io::rest::student_apis::router())
        .merge(io::rest::aspect_apis::router())
        .merge(io::rest::staff_apis::router())
        .merge(io::rest::lateness_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
