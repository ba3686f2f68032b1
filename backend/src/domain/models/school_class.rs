//! Domain model for a class (rombongan belajar).
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: String,
    pub name: String,
    pub grade: Option<String>,
    pub created_at: String, // RFC 3339 timestamp
}
