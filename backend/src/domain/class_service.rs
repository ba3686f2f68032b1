use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::domain::commands::classes::ClassCommand;
use crate::domain::errors::PointError;
use crate::domain::models::school_class::SchoolClass;
use crate::domain::{timestamp_now, validate_name};
use crate::storage::{ClassStorage, Connection};

/// Service for managing classes
#[derive(Clone)]
pub struct ClassService<C: Connection> {
    class_repository: C::ClassRepository,
}

impl<C: Connection> ClassService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            class_repository: connection.create_class_repository(),
        }
    }

    /// All classes ordered by grade, then name
    pub async fn list_classes(&self) -> Result<Vec<SchoolClass>> {
        let classes = self.class_repository.list_classes().await?;
        info!("Found {} classes", classes.len());
        Ok(classes)
    }

    pub async fn get_class(&self, class_id: &str) -> Result<SchoolClass> {
        let class = self
            .class_repository
            .get_class(class_id)
            .await?
            .ok_or_else(|| PointError::not_found("Class", class_id))?;
        Ok(class)
    }

    pub async fn create_class(&self, command: ClassCommand) -> Result<SchoolClass> {
        info!("Creating class: {}", command.name);

        let class = SchoolClass {
            id: uuid::Uuid::new_v4().to_string(),
            name: validate_name("Class", &command.name)?,
            grade: normalize_grade(command.grade),
            created_at: timestamp_now(),
        };
        self.class_repository.store_class(&class).await?;

        info!("Created class {} with ID {}", class.name, class.id);
        Ok(class)
    }

    pub async fn update_class(&self, class_id: &str, command: ClassCommand) -> Result<SchoolClass> {
        info!("Updating class: {}", class_id);

        let mut class = self.get_class(class_id).await?;
        class.name = validate_name("Class", &command.name)?;
        class.grade = normalize_grade(command.grade);
        self.class_repository.update_class(&class).await?;

        Ok(class)
    }

    /// Students of a deleted class become classless and records filed under
    /// it lose their class reference.
    pub async fn delete_class(&self, class_id: &str) -> Result<()> {
        info!("Deleting class: {}", class_id);

        if !self.class_repository.delete_class(class_id).await? {
            return Err(PointError::not_found("Class", class_id).into());
        }
        Ok(())
    }
}

fn normalize_grade(grade: Option<String>) -> Option<String> {
    grade
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
}
