use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{DeviceId, OrderId, UserId};
use crate::error::ValidationError;
use crate::validation::require_non_empty;

/// Informational order status; not recomputed from device statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

/// A client's batch of devices. Devices are referenced by id; their current
/// status always comes from the device collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub client_id: UserId,
    pub device_ids: Vec<DeviceId>,
    pub total_devices: u32,
    pub completed_devices: u32,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        id: impl Into<OrderId>,
        client_id: impl Into<UserId>,
        device_ids: Vec<DeviceId>,
        now: DateTime<Utc>,
    ) -> Self {
        let total_devices = device_ids.len() as u32;
        Self {
            id: id.into(),
            client_id: client_id.into(),
            device_ids,
            total_devices,
            completed_devices: 0,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("order.id", self.id.as_str())?;
        require_non_empty("order.clientId", self.client_id.as_str())?;
        if self.completed_devices > self.total_devices {
            return Err(ValidationError::new(
                "order.completedDevices",
                format!(
                    "{} completed exceeds {} total",
                    self.completed_devices, self.total_devices
                ),
            ));
        }
        Ok(())
    }
}

/// Live view of an order's devices, derived on demand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProgress {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub in_progress: usize,
    /// Ids listed on the order that no longer exist in the device store
    pub missing: usize,
}

impl OrderProgress {
    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.in_progress == 0 && self.missing == 0
    }
}
