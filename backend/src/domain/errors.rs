//! Error taxonomy shared by the domain services.
//!
//! Services return `anyhow::Result`; when a failure belongs to one of these
//! categories it is raised as a `PointError` so the REST layer can recover
//! the category with `downcast_ref` and pick a status code.
//!
//! Missing settings are not an error: the resolver falls back to defaults.
//! An unreachable settings store is reported as `Persistence`.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl PointError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        PointError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        PointError::InvalidInput(message.into())
    }

    pub fn persistence(err: impl std::fmt::Display) -> Self {
        PointError::Persistence(err.to_string())
    }
}
