// Workflow engine - pure device transitions
//
// Given a device and a request from a stage, the engine finds the matching
// rule, produces the updated device and (for approve/reject decisions) the
// review record. It never touches the store; callers dispatch the outcome.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::transitions::{find_rule, Actor, Decision, Effect};
use crate::entities::{Device, DeviceStatus, NoteTrack, ReviewId, TechnicianId, UserId};
use crate::error::{ValidationError, WorkflowError};
use crate::ledger::ReviewRecord;
use crate::store::Action;
use crate::validation::require_non_empty;

/// Note left on the QC track when intake hands a device to QC
pub const ROUTED_TO_QC: &str = "Routed to QC";

/// A stage's decision about one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub actor: Actor,
    pub decision: Decision,
    pub reviewer_id: UserId,
    pub notes: String,
    /// Required for technician assignment
    pub technician_id: Option<TechnicianId>,
}

impl ReviewRequest {
    pub fn new(actor: Actor, decision: Decision, reviewer_id: impl Into<UserId>) -> Self {
        Self {
            actor,
            decision,
            reviewer_id: reviewer_id.into(),
            notes: String::new(),
            technician_id: None,
        }
    }

    pub fn route_to_qc(reviewer_id: impl Into<UserId>) -> Self {
        Self::new(Actor::OrderIntake, Decision::AssignToQc, reviewer_id)
    }

    pub fn assign(
        manager_id: impl Into<UserId>,
        technician_id: impl Into<TechnicianId>,
        notes: impl Into<String>,
    ) -> Self {
        Self::new(Actor::TechnicianManager, Decision::Assign, manager_id)
            .with_notes(notes)
            .with_technician(technician_id)
    }

    pub fn approve(actor: Actor, reviewer_id: impl Into<UserId>, notes: impl Into<String>) -> Self {
        Self::new(actor, Decision::Approve, reviewer_id).with_notes(notes)
    }

    pub fn reject(actor: Actor, reviewer_id: impl Into<UserId>, notes: impl Into<String>) -> Self {
        Self::new(actor, Decision::Reject, reviewer_id).with_notes(notes)
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_technician(mut self, technician_id: impl Into<TechnicianId>) -> Self {
        self.technician_id = Some(technician_id.into());
        self
    }
}

/// Result of a successful transition
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub from: DeviceStatus,
    pub to: DeviceStatus,
    pub device: Device,
    pub review: Option<ReviewRecord>,
}

impl TransitionOutcome {
    /// Actions to dispatch as one batch: the device update, then the review
    pub fn into_actions(self) -> Vec<Action> {
        let mut actions = vec![Action::UpdateDevice(self.device)];
        if let Some(review) = self.review {
            actions.push(Action::record_review(review));
        }
        actions
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowEngine<C: Clock = SystemClock> {
    clock: C,
}

impl WorkflowEngine<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> WorkflowEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Computes the next state of `device`. The input device is left untouched.
    pub fn apply(
        &self,
        device: &Device,
        request: &ReviewRequest,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let rule = find_rule(
            device.status,
            device.is_assigned(),
            request.actor,
            request.decision,
        )
        .inspect_err(|e| {
            warn!(
                device_id = %device.id,
                status = %device.status,
                actor = %request.actor,
                decision = %request.decision,
                "Rejected workflow transition: {}",
                e
            );
        })?;

        require_non_empty("reviewerId", request.reviewer_id.as_str())?;

        let now = self.clock.now();
        let mut next = device.clone();
        next.status = rule.to;
        next.updated_at = now;

        match rule.effect {
            Effect::RouteToQc => {
                next.qc_id = Some(request.reviewer_id.clone());
                next.qc_date = Some(now);
                let note = match request.notes.trim() {
                    "" => ROUTED_TO_QC.to_string(),
                    notes => format!("{ROUTED_TO_QC}: {notes}"),
                };
                next.qc_notes.push(note);
            }
            Effect::AssignTechnician => {
                let technician_id = request
                    .technician_id
                    .clone()
                    .filter(|id| !id.is_blank())
                    .ok_or_else(|| {
                        ValidationError::new("technicianId", "required to assign a device")
                    })?;
                next.technician_id = Some(technician_id);
                next.technician_notes.push(request.notes.clone());
            }
            Effect::AppendNote { track, prefix } => {
                let note = match prefix {
                    Some(prefix) => format!("{prefix} {}", request.notes).trim_end().to_string(),
                    None => request.notes.clone(),
                };
                next.notes_mut(track).push(note);
            }
            Effect::ReleaseTechnician => {
                next.notes_mut(NoteTrack::Inventory).push(request.notes.clone());
                next.technician_id = None;
            }
        }

        if rule.to == DeviceStatus::Completed {
            next.completed_at = Some(now);
        }

        let review = request
            .actor
            .review_stage()
            .zip(request.decision.review_status())
            .map(|(stage, status)| ReviewRecord {
                id: ReviewId::generate(),
                device_id: device.id.clone(),
                order_id: device.order_ref(),
                reviewer_id: request.reviewer_id.clone(),
                stage,
                status,
                notes: request.notes.clone(),
                created_at: now,
            });

        info!(
            device_id = %device.id,
            from = %device.status,
            to = %rule.to,
            actor = %request.actor,
            decision = %request.decision,
            reviewer_id = %request.reviewer_id,
            "Device workflow transition"
        );

        Ok(TransitionOutcome {
            from: device.status,
            to: rule.to,
            device: next,
            review,
        })
    }
}
