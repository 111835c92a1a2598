use std::sync::Arc;

use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::engine::{ReviewRequest, TransitionOutcome, WorkflowEngine};
use super::transitions::{Actor, Decision};
use crate::entities::{DeviceId, Order, TechnicianId, UserId};
use crate::error::{Collection, RefurbError, StoreError};
use crate::intake::{DeviceSubmission, OrderIntake};
use crate::ledger::ReviewStatus;
use crate::observability::workflow_metrics;
use crate::store::{AppState, Store};
use crate::telemetry::{create_transition_span, generate_correlation_id};

/// Runs workflow operations against a store: look up, compute, dispatch
#[derive(Debug)]
pub struct WorkflowCoordinator<C: Clock = SystemClock> {
    store: Store,
    engine: WorkflowEngine<C>,
    intake: OrderIntake,
    metrics_enabled: bool,
}

impl WorkflowCoordinator<SystemClock> {
    pub fn new(store: Store) -> Self {
        Self::with_engine(store, WorkflowEngine::new())
    }
}

impl<C: Clock> WorkflowCoordinator<C> {
    pub fn with_engine(store: Store, engine: WorkflowEngine<C>) -> Self {
        Self {
            store,
            engine,
            intake: OrderIntake::default(),
            metrics_enabled: true,
        }
    }

    pub fn with_intake(mut self, intake: OrderIntake) -> Self {
        self.intake = intake;
        self
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    /// Validates the submissions and adds the devices plus their order in one
    /// batch
    pub fn place_order(
        &mut self,
        client_id: &UserId,
        submissions: &[DeviceSubmission],
    ) -> Result<Order, RefurbError> {
        let placed = self
            .intake
            .build_order(client_id, submissions, self.engine.clock())?;
        let order = placed.order.clone();
        self.store.dispatch_batch(placed.into_actions())?;

        if self.metrics_enabled {
            workflow_metrics().record_order();
        }
        info!(order_id = %order.id, devices = order.device_ids.len(), "Order placed");
        Ok(order)
    }

    pub fn route_to_qc(
        &mut self,
        device_id: &DeviceId,
        staff_id: impl Into<UserId>,
    ) -> Result<TransitionOutcome, RefurbError> {
        self.transition(device_id, &ReviewRequest::route_to_qc(staff_id))
    }

    /// Hands a device waiting at the bench to a registered technician
    pub fn assign_technician(
        &mut self,
        device_id: &DeviceId,
        manager_id: impl Into<UserId>,
        technician_id: &TechnicianId,
        notes: impl Into<String>,
    ) -> Result<TransitionOutcome, RefurbError> {
        if self.store.state().technician(technician_id).is_none() {
            return Err(StoreError::NotFound {
                collection: Collection::Technicians,
                id: technician_id.to_string(),
            }
            .into());
        }
        let request = ReviewRequest::assign(manager_id, technician_id.clone(), notes);
        self.transition(device_id, &request)
    }

    /// Files an approve/reject verdict from `actor`
    pub fn review(
        &mut self,
        device_id: &DeviceId,
        actor: Actor,
        reviewer_id: impl Into<UserId>,
        verdict: ReviewStatus,
        notes: impl Into<String>,
    ) -> Result<TransitionOutcome, RefurbError> {
        let decision = match verdict {
            ReviewStatus::Approved => Decision::Approve,
            ReviewStatus::Rejected => Decision::Reject,
        };
        let request = ReviewRequest::new(actor, decision, reviewer_id).with_notes(notes);
        self.transition(device_id, &request)
    }

    /// Looks up the device, runs the engine and dispatches the device update
    /// together with its review record
    pub fn transition(
        &mut self,
        device_id: &DeviceId,
        request: &ReviewRequest,
    ) -> Result<TransitionOutcome, RefurbError> {
        let correlation_id = generate_correlation_id();
        let span = create_transition_span(request.decision.as_str(), device_id.as_str(), &correlation_id);
        let _enter = span.enter();

        let Some(device) = self.store.state().device(device_id) else {
            warn!(device_id = %device_id, "Transition requested for unknown device");
            return Err(StoreError::NotFound {
                collection: Collection::Devices,
                id: device_id.to_string(),
            }
            .into());
        };

        let outcome = match self.engine.apply(device, request) {
            Ok(outcome) => outcome,
            Err(e) => {
                if self.metrics_enabled && e.is_invalid_transition() {
                    workflow_metrics().record_invalid_attempt();
                }
                return Err(e.into());
            }
        };

        self.store.dispatch_batch(outcome.clone().into_actions())?;

        if self.metrics_enabled {
            let metrics = workflow_metrics();
            metrics.record_transition(outcome.to);
            match outcome.review.as_ref().map(|review| review.status) {
                Some(ReviewStatus::Approved) => metrics.record_approval(),
                Some(ReviewStatus::Rejected) => metrics.record_rejection(),
                None => {}
            }
        }
        Ok(outcome)
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.store.snapshot()
    }
}
