use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{DeviceId, TechnicianId};
use crate::error::ValidationError;
use crate::validation::{require_email, require_non_empty};

/// Bench technician. Assignments are not stored here; they are derived from
/// each device's `technicianId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub created_at: DateTime<Utc>,
}

impl Technician {
    pub fn new(
        id: impl Into<TechnicianId>,
        name: impl Into<String>,
        email: impl Into<String>,
        specialization: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            specialization: specialization.into(),
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("technician.id", self.id.as_str())?;
        require_non_empty("technician.name", &self.name)?;
        require_email("technician.email", &self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianWorkload {
    pub technician_id: TechnicianId,
    /// Devices currently assigned and not yet terminal
    pub assigned: Vec<DeviceId>,
    pub completed: usize,
}
