//! Staff profiles and identification of the acting staff member.
//!
//! Authentication is not handled here: callers pass the id of the staff
//! member they act as and this service only checks that the profile exists.
use std::sync::Arc;

use anyhow::Result;
use shared::StaffRole;
use tracing::{info, warn};

use crate::domain::commands::staff::CreateStaffCommand;
use crate::domain::errors::PointError;
use crate::domain::models::staff::Staff;
use crate::domain::{timestamp_now, validate_name};
use crate::storage::{ClassStorage, Connection, StaffStorage};

#[derive(Clone)]
pub struct StaffService<C: Connection> {
    staff_repository: C::StaffRepository,
    class_repository: C::ClassRepository,
}

impl<C: Connection> StaffService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            staff_repository: connection.create_staff_repository(),
            class_repository: connection.create_class_repository(),
        }
    }

    /// Look up the acting staff member. Missing or unknown ids are
    /// `Unauthorized`.
    pub async fn resolve_actor(&self, staff_id: Option<&str>) -> Result<Staff> {
        let staff_id = staff_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PointError::Unauthorized("No acting staff member given".to_string()))?;

        match self.staff_repository.get_staff(staff_id).await? {
            Some(staff) => Ok(staff),
            None => {
                warn!("Rejected unknown staff id {}", staff_id);
                Err(PointError::Unauthorized(format!("Unknown staff member: {}", staff_id)).into())
            }
        }
    }

    /// Admin only
    pub async fn list_staff(&self, actor: &Staff) -> Result<Vec<Staff>> {
        actor.ensure_role(&[StaffRole::Admin], "list staff")?;
        self.staff_repository.list_staff().await
    }

    /// Admin only, except for the very first profile, which may be created
    /// without an actor and must be an admin.
    pub async fn create_staff(
        &self,
        actor: Option<&Staff>,
        command: CreateStaffCommand,
    ) -> Result<Staff> {
        match actor {
            Some(actor) => actor.ensure_role(&[StaffRole::Admin], "create staff")?,
            None if command.role != StaffRole::Admin => {
                return Err(PointError::invalid(format!(
                    "The first staff profile must be an admin, not '{}'",
                    command.role
                ))
                .into())
            }
            None => info!("Bootstrapping first staff profile"),
        }

        let name = validate_name("Staff", &command.name)?;
        let class_id = match (command.role, command.class_id.filter(|id| !id.trim().is_empty())) {
            (StaffRole::Walas, None) => {
                return Err(PointError::invalid("A homeroom teacher needs a class").into())
            }
            (_, Some(class_id)) => {
                if self.class_repository.get_class(&class_id).await?.is_none() {
                    return Err(PointError::not_found("Class", class_id).into());
                }
                Some(class_id)
            }
            (_, None) => None,
        };

        let staff = Staff {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            role: command.role,
            class_id,
            created_at: timestamp_now(),
        };
        if actor.is_some() {
            self.staff_repository.store_staff(&staff).await?;
        } else if !self.staff_repository.store_first_staff(&staff).await? {
            return Err(PointError::Unauthorized("No acting staff member given".to_string()).into());
        }

        info!("Created staff {} ({}) with ID {}", staff.name, staff.role, staff.id);
        Ok(staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{connection, seed_class};
    use crate::storage::DbConnection;

    async fn service() -> StaffService<DbConnection> {
        let conn = connection().await;
        seed_class(&conn, "class-1", "X-1").await;
        StaffService::new(conn)
    }

    fn command(name: &str, role: StaffRole, class_id: Option<&str>) -> CreateStaffCommand {
        CreateStaffCommand {
            name: name.to_string(),
            role,
            class_id: class_id.map(str::to_string),
        }
    }

    fn is_unauthorized(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<PointError>(), Some(PointError::Unauthorized(_)))
    }

    #[tokio::test]
    async fn test_bootstrap_then_admin_only() {
        let service = service().await;
        let admin = service
            .create_staff(None, command("Admin", StaffRole::Admin, None))
            .await
            .unwrap();

        let err = service
            .create_staff(None, command("Second", StaffRole::Admin, None))
            .await
            .unwrap_err();
        assert!(is_unauthorized(&err));

        let walas = service
            .create_staff(Some(&admin), command("Bu Rina", StaffRole::Walas, Some("class-1")))
            .await
            .unwrap();
        let err = service
            .create_staff(Some(&walas), command("Other", StaffRole::PetugasScan, None))
            .await
            .unwrap_err();
        assert!(is_unauthorized(&err));

        assert_eq!(service.list_staff(&admin).await.unwrap().len(), 2);
        assert!(is_unauthorized(&service.list_staff(&walas).await.unwrap_err()));
    }

    #[tokio::test]
    async fn test_bootstrap_must_create_an_admin() {
        let service = service().await;
        let err = service
            .create_staff(None, command("Petugas", StaffRole::PetugasScan, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PointError>(),
            Some(PointError::InvalidInput(_))
        ));

        // The rejected attempt leaves the bootstrap open
        let admin = service
            .create_staff(None, command("Admin", StaffRole::Admin, None))
            .await
            .unwrap();
        assert_eq!(admin.role, StaffRole::Admin);
        assert_eq!(service.list_staff(&admin).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_bootstraps_create_one_admin() {
        let service = service().await;
        let (first, second) = tokio::join!(
            service.create_staff(None, command("Admin A", StaffRole::Admin, None)),
            service.create_staff(None, command("Admin B", StaffRole::Admin, None)),
        );

        let created: Vec<Staff> = [first, second].into_iter().filter_map(Result::ok).collect();
        assert_eq!(created.len(), 1);
        assert_eq!(service.list_staff(&created[0]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_walas_needs_existing_class() {
        let service = service().await;
        let admin = service
            .create_staff(None, command("Admin", StaffRole::Admin, None))
            .await
            .unwrap();

        let err = service
            .create_staff(Some(&admin), command("Bu Rina", StaffRole::Walas, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PointError>(),
            Some(PointError::InvalidInput(_))
        ));

        let err = service
            .create_staff(Some(&admin), command("Bu Rina", StaffRole::Walas, Some("nope")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Class not found: nope");
    }

    #[tokio::test]
    async fn test_resolve_actor() {
        let service = service().await;
        let admin = service
            .create_staff(None, command("Admin", StaffRole::Admin, None))
            .await
            .unwrap();

        assert_eq!(service.resolve_actor(Some(&admin.id)).await.unwrap(), admin);
        assert!(is_unauthorized(&service.resolve_actor(None).await.unwrap_err()));
        assert!(is_unauthorized(&service.resolve_actor(Some("  ")).await.unwrap_err()));
        assert!(is_unauthorized(&service.resolve_actor(Some("ghost")).await.unwrap_err()));
    }
}
