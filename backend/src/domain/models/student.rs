//! Domain model for a student.
use serde::{Deserialize, Serialize};
use shared::Gender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub nisn: Option<String>,
    pub name: String,
    pub gender: Option<Gender>,
    pub class_id: Option<String>,
    /// Filled by reads that join the class; ignored on writes
    pub class_name: Option<String>,
    pub created_at: String,
}
