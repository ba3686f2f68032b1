use serde::{Deserialize, Serialize};
use shared::StaffRole;

use crate::domain::errors::PointError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
    pub class_id: Option<String>,
    pub created_at: String,
}

impl Staff {
    /// Admin and principal see school-wide data
    pub fn is_school_wide(&self) -> bool {
        matches!(self.role, StaffRole::Admin | StaffRole::Kepsek)
    }

    /// The class a homeroom teacher is scoped to, if any
    pub fn homeroom_class(&self) -> Option<&str> {
        match self.role {
            StaffRole::Walas => self.class_id.as_deref(),
            _ => None,
        }
    }

    /// Fail with `Unauthorized` unless this staff member holds one of `allowed`
    pub fn ensure_role(&self, allowed: &[StaffRole], action: &str) -> Result<(), PointError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(PointError::Unauthorized(format!(
                "Role '{}' may not {}",
                self.role, action
            )))
        }
    }
}
