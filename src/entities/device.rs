use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{DeviceId, OrderId, TechnicianId, UserId};
use crate::error::ValidationError;
use crate::validation::require_non_empty;

/// Where a device sits in the refurbishment workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceStatus {
    /// Submitted with an order, not yet routed
    Pending,
    /// Awaiting quality control inspection
    Qc,
    /// With the technician bench (assigned or waiting for assignment)
    Technician,
    /// Quality check after a repair, before clearance
    RepairQc,
    /// Secondary triage after a technician rejected the device
    Inventory,
    /// Final approval before completion
    Clearance,
    Completed,
    Failed,
}

impl DeviceStatus {
    pub const ALL: [DeviceStatus; 8] = [
        DeviceStatus::Pending,
        DeviceStatus::Qc,
        DeviceStatus::Technician,
        DeviceStatus::RepairQc,
        DeviceStatus::Inventory,
        DeviceStatus::Clearance,
        DeviceStatus::Completed,
        DeviceStatus::Failed,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, DeviceStatus::Completed | DeviceStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Pending => "pending",
            DeviceStatus::Qc => "qc",
            DeviceStatus::Technician => "technician",
            DeviceStatus::RepairQc => "repair-qc",
            DeviceStatus::Inventory => "inventory",
            DeviceStatus::Clearance => "clearance",
            DeviceStatus::Completed => "completed",
            DeviceStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which notes array a stage writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteTrack {
    General,
    Qc,
    Technician,
    Clearance,
    Inventory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub brand: String,
    pub model: String,
    pub imei: String,
    pub reported_issue: String,
    pub status: DeviceStatus,
    pub client_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<TechnicianId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qc_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qc_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub qc_notes: Vec<String>,
    #[serde(default)]
    pub technician_notes: Vec<String>,
    #[serde(default)]
    pub clearance_notes: Vec<String>,
    #[serde(default)]
    pub inventory_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Device {
    /// A freshly submitted device in `pending`
    pub fn new(
        id: impl Into<DeviceId>,
        brand: impl Into<String>,
        model: impl Into<String>,
        imei: impl Into<String>,
        reported_issue: impl Into<String>,
        client_id: impl Into<UserId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            imei: imei.into(),
            reported_issue: reported_issue.into(),
            status: DeviceStatus::Pending,
            client_id: client_id.into(),
            technician_id: None,
            qc_id: None,
            qc_date: None,
            notes: Vec::new(),
            qc_notes: Vec::new(),
            technician_notes: Vec::new(),
            clearance_notes: Vec::new(),
            inventory_notes: Vec::new(),
            estimate: None,
            box_id: None,
            order_id: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn with_order(mut self, order_id: impl Into<OrderId>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_technician(mut self, technician_id: impl Into<TechnicianId>) -> Self {
        self.technician_id = Some(technician_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("device.id", self.id.as_str())?;
        require_non_empty("device.brand", &self.brand)?;
        require_non_empty("device.model", &self.model)?;
        require_non_empty("device.clientId", self.client_id.as_str())
    }

    pub fn is_assigned(&self) -> bool {
        self.technician_id.is_some()
    }

    pub fn notes_for(&self, track: NoteTrack) -> &[String] {
        match track {
            NoteTrack::General => &self.notes,
            NoteTrack::Qc => &self.qc_notes,
            NoteTrack::Technician => &self.technician_notes,
            NoteTrack::Clearance => &self.clearance_notes,
            NoteTrack::Inventory => &self.inventory_notes,
        }
    }

    pub(crate) fn notes_mut(&mut self, track: NoteTrack) -> &mut Vec<String> {
        match track {
            NoteTrack::General => &mut self.notes,
            NoteTrack::Qc => &mut self.qc_notes,
            NoteTrack::Technician => &mut self.technician_notes,
            NoteTrack::Clearance => &mut self.clearance_notes,
            NoteTrack::Inventory => &mut self.inventory_notes,
        }
    }

    /// Order id as written into review records (empty when the device has none)
    pub fn order_ref(&self) -> String {
        self.order_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}
