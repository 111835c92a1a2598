// refurb-tracker library - device refurbishment workflow
// Exposes the workflow core, store and persistence for the CLI and tests

pub mod cli;
pub mod config;
pub mod entities;
pub mod error;
pub mod intake;
pub mod ledger;
pub mod observability;
pub mod persistence;
pub mod seed;
pub mod store;
pub mod telemetry;
pub mod validation;
pub mod workflow;

// Re-export key types for easy access
pub use config::{config, RefurbConfig};
pub use entities::{
    AppSettings, Device, DeviceId, DeviceStatus, Order, OrderId, Report, Role, Technician,
    TechnicianId, User, UserId,
};
pub use error::{Collection, RefurbError, StoreError, ValidationError, WorkflowError};
pub use intake::{DeviceSubmission, OrderIntake, PlacedOrder};
pub use ledger::{ReviewLedger, ReviewRecord, ReviewStage, ReviewStatus};
pub use observability::{workflow_metrics, OperationTimer, WorkflowMetrics};
pub use persistence::{
    FileSystemPersistence, PersistenceConfig, PersistenceError, SnapshotTracker, StatePersistence,
};
pub use store::{reduce, Action, AppState, MissingTargetPolicy, Store};
pub use telemetry::{generate_correlation_id, init_telemetry};
pub use workflow::{
    Actor, Clock, Decision, FixedClock, ReviewRequest, SystemClock, TransitionOutcome,
    WorkflowCoordinator, WorkflowEngine,
};
