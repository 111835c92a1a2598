// Error taxonomy for the workflow core
//
// Each layer owns its enum; `RefurbError` is the umbrella the coordinator
// returns so callers can match on the concrete failure.

use std::fmt;
use thiserror::Error;

use crate::entities::DeviceStatus;
use crate::workflow::transitions::{Actor, Decision};

/// Malformed input to a create or update operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Collections held by the app state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Devices,
    Orders,
    Technicians,
    Reports,
    QcReviews,
    TechnicianReviews,
    ClearanceReviews,
    InventoryReviews,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Users => "users",
            Collection::Devices => "devices",
            Collection::Orders => "orders",
            Collection::Technicians => "technicians",
            Collection::Reports => "reports",
            Collection::QcReviews => "qcReviews",
            Collection::TechnicianReviews => "technicianReviews",
            Collection::ClearanceReviews => "clearanceReviews",
            Collection::InventoryReviews => "inventoryReviews",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Invalid transition: {actor} cannot {decision} a device in status {status}")]
    InvalidTransition {
        status: DeviceStatus,
        actor: Actor,
        decision: Decision,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl WorkflowError {
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, WorkflowError::InvalidTransition { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Duplicate id '{id}' in {collection}")]
    DuplicateId { collection: Collection, id: String },

    #[error("No entry '{id}' in {collection}")]
    NotFound { collection: Collection, id: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefurbError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl RefurbError {
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            RefurbError::Workflow(WorkflowError::InvalidTransition { .. })
        )
    }
}
