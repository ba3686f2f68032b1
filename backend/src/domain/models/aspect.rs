//! Domain models for aspects and their rules.
use serde::{Deserialize, Serialize};
use shared::{InputMethod, Polarity};

/// Name of the aspect that automatic attendance records are filed under
pub const ATTENDANCE_ASPECT_NAME: &str = "Kehadiran";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub id: String,
    pub name: String,
    pub polarity: Polarity,
    pub input_method: InputMethod,
    pub active: bool,
    pub created_at: String,
}

impl Aspect {
    /// The attendance aspect as it is created on first use
    pub fn attendance(id: String, created_at: String) -> Self {
        Self {
            id,
            name: ATTENDANCE_ASPECT_NAME.to_string(),
            polarity: Polarity::Negative,
            input_method: InputMethod::Qr,
            active: true,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRule {
    pub id: String,
    pub aspect_id: String,
    pub name: String,
    pub point: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectWithRules {
    pub aspect: Aspect,
    pub rules: Vec<AspectRule>,
}
