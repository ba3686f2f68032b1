use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::domain::commands::students::StudentCommand;
use crate::domain::errors::PointError;
use crate::domain::models::student::Student;
use crate::domain::{timestamp_now, validate_name};
use crate::storage::{ClassStorage, Connection, StudentStorage};

/// Service for managing students
#[derive(Clone)]
pub struct StudentService<C: Connection> {
    student_repository: C::StudentRepository,
    class_repository: C::ClassRepository,
}

impl<C: Connection> StudentService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            student_repository: connection.create_student_repository(),
            class_repository: connection.create_class_repository(),
        }
    }

    /// All students newest first, or one class ordered by name
    pub async fn list_students(&self, class_id: Option<&str>) -> Result<Vec<Student>> {
        let students = self.student_repository.list_students(class_id).await?;
        info!("Found {} students", students.len());
        Ok(students)
    }

    pub async fn get_student(&self, student_id: &str) -> Result<Student> {
        let student = self
            .student_repository
            .get_student(student_id)
            .await?
            .ok_or_else(|| PointError::not_found("Student", student_id))?;
        Ok(student)
    }

    pub async fn create_student(&self, command: StudentCommand) -> Result<Student> {
        info!("Creating student: {}", command.name);

        let student = self.build_student(command).await?;
        self.student_repository.store_student(&student).await?;

        info!("Created student {} with ID {}", student.name, student.id);
        self.get_student(&student.id).await
    }

    /// Moving a student to another class leaves their existing records
    /// filed under the old class.
    pub async fn update_student(
        &self,
        student_id: &str,
        command: StudentCommand,
    ) -> Result<Student> {
        info!("Updating student: {}", student_id);

        let mut student = self.get_student(student_id).await?;
        let class_id = self.validated_class(command.class_id).await?;
        student.name = validate_name("Student", &command.name)?;
        student.nisn = normalize_nisn(command.nisn);
        student.gender = command.gender;
        student.class_id = class_id;
        self.student_repository.update_student(&student).await?;

        self.get_student(student_id).await
    }

    /// Records of a deleted student are deleted with them
    pub async fn delete_student(&self, student_id: &str) -> Result<()> {
        info!("Deleting student: {}", student_id);

        if !self.student_repository.delete_student(student_id).await? {
            return Err(PointError::not_found("Student", student_id).into());
        }
        Ok(())
    }

    pub async fn delete_students(&self, student_ids: &[String]) -> Result<u64> {
        info!("Deleting {} students", student_ids.len());

        if student_ids.is_empty() {
            return Err(PointError::invalid("Select at least one student").into());
        }
        let deleted = self.student_repository.delete_students(student_ids).await?;
        if deleted < student_ids.len() as u64 {
            warn!(
                "Deleted {} of {} requested students",
                deleted,
                student_ids.len()
            );
        }
        Ok(deleted)
    }

    /// Validate every row, then insert them all in one transaction
    pub async fn import_students(&self, commands: Vec<StudentCommand>) -> Result<usize> {
        info!("Importing {} students", commands.len());

        if commands.is_empty() {
            return Err(PointError::invalid("Nothing to import").into());
        }

        let mut students = Vec::with_capacity(commands.len());
        for (row, command) in commands.into_iter().enumerate() {
            let student = self.build_student(command).await.map_err(|e| match e
                .downcast::<PointError>()
            {
                Ok(PointError::InvalidInput(msg)) => {
                    PointError::invalid(format!("Row {}: {}", row + 1, msg)).into()
                }
                Ok(other) => anyhow::Error::from(other),
                Err(other) => other,
            })?;
            students.push(student);
        }

        self.student_repository.store_students(&students).await?;

        info!("Imported {} students", students.len());
        Ok(students.len())
    }

    async fn build_student(&self, command: StudentCommand) -> Result<Student> {
        let name = validate_name("Student", &command.name)?;
        let class_id = self.validated_class(command.class_id).await?;
        Ok(Student {
            id: uuid::Uuid::new_v4().to_string(),
            nisn: normalize_nisn(command.nisn),
            name,
            gender: command.gender,
            class_id,
            class_name: None,
            created_at: timestamp_now(),
        })
    }

    /// An empty class id means "no class"; any other must exist
    async fn validated_class(&self, class_id: Option<String>) -> Result<Option<String>> {
        match class_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                if self.class_repository.get_class(&id).await?.is_none() {
                    return Err(PointError::not_found("Class", id).into());
                }
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }
}

fn normalize_nisn(nisn: Option<String>) -> Option<String> {
    nisn.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{connection, seed_class};
    use crate::storage::DbConnection;
    use shared::Gender;

    async fn service() -> StudentService<DbConnection> {
        let conn = connection().await;
        seed_class(&conn, "class-1", "X-1").await;
        seed_class(&conn, "class-2", "X-2").await;
        StudentService::new(conn)
    }

    fn command(name: &str, class_id: Option<&str>) -> StudentCommand {
        StudentCommand {
            nisn: Some(" 0051234567 ".to_string()),
            name: name.to_string(),
            class_id: class_id.map(str::to_string),
            gender: Some(Gender::Male),
        }
    }

    #[tokio::test]
    async fn test_create_returns_class_name() {
        let service = service().await;
        let student = service.create_student(command("Adi", Some("class-1"))).await.unwrap();
        assert_eq!(student.class_name.as_deref(), Some("X-1"));
        assert_eq!(student.nisn.as_deref(), Some("0051234567"));
        assert_eq!(student.gender, Some(Gender::Male));
    }

    #[tokio::test]
    async fn test_unknown_class_is_not_found() {
        let service = service().await;
        let err = service
            .create_student(command("Adi", Some("nope")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Class not found: nope");

        let classless = service.create_student(command("Adi", Some(""))).await.unwrap();
        assert_eq!(classless.class_id, None);
    }

    #[tokio::test]
    async fn test_update_moves_class() {
        let service = service().await;
        let student = service.create_student(command("Adi", Some("class-1"))).await.unwrap();
        let updated = service
            .update_student(&student.id, command("Adi Saputra", Some("class-2")))
            .await
            .unwrap();
        assert_eq!(updated.name, "Adi Saputra");
        assert_eq!(updated.class_name.as_deref(), Some("X-2"));
        assert_eq!(
            service.list_students(Some("class-1")).await.unwrap().len(),
            0
        );
    }

    #[tokio::test]
    async fn test_import_is_all_or_nothing() {
        let service = service().await;
        let err = service
            .import_students(vec![command("Adi", Some("class-1")), command("", None)])
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<PointError>(),
            Some(&PointError::InvalidInput("Row 2: Student name cannot be empty".to_string()))
        );
        assert!(service.list_students(None).await.unwrap().is_empty());

        let count = service
            .import_students(vec![command("Adi", Some("class-1")), command("Budi", None)])
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_delete_paths() {
        let service = service().await;
        let a = service.create_student(command("Adi", None)).await.unwrap();
        let b = service.create_student(command("Budi", None)).await.unwrap();

        service.delete_student(&a.id).await.unwrap();
        assert!(service.delete_student(&a.id).await.is_err());
        assert!(service.get_student(&a.id).await.is_err());

        let deleted = service
            .delete_students(&[b.id.clone(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(service.delete_students(&[]).await.is_err());
    }
}
