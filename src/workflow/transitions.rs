// Device workflow transition table
//
// The table is data: every row names the status it applies to, whether the
// device must (or must not) have a technician, the acting stage, the
// decision, the resulting status and the side effect on the device. Anything
// not in the table is an invalid transition.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{DeviceStatus, NoteTrack};
use crate::error::WorkflowError;
use crate::ledger::{ReviewStage, ReviewStatus};

/// The stage acting on a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Actor {
    /// Enterprise staff receiving new orders
    OrderIntake,
    QcReviewer,
    /// Hands devices waiting at the bench to a technician
    TechnicianManager,
    Technician,
    InventoryReviewer,
    RepairQcReviewer,
    ClearanceReviewer,
}

impl Actor {
    pub const ALL: [Actor; 7] = [
        Actor::OrderIntake,
        Actor::QcReviewer,
        Actor::TechnicianManager,
        Actor::Technician,
        Actor::InventoryReviewer,
        Actor::RepairQcReviewer,
        Actor::ClearanceReviewer,
    ];

    /// Ledger stage for actors that file approved/rejected reviews
    pub fn review_stage(self) -> Option<ReviewStage> {
        match self {
            Actor::OrderIntake | Actor::TechnicianManager => None,
            Actor::QcReviewer => Some(ReviewStage::Qc),
            Actor::Technician => Some(ReviewStage::Technician),
            Actor::InventoryReviewer => Some(ReviewStage::Inventory),
            Actor::RepairQcReviewer => Some(ReviewStage::RepairQc),
            Actor::ClearanceReviewer => Some(ReviewStage::Clearance),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Actor::OrderIntake => "order intake",
            Actor::QcReviewer => "QC reviewer",
            Actor::TechnicianManager => "technician manager",
            Actor::Technician => "technician",
            Actor::InventoryReviewer => "inventory reviewer",
            Actor::RepairQcReviewer => "repair-QC reviewer",
            Actor::ClearanceReviewer => "clearance reviewer",
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    AssignToQc,
    Assign,
    Approve,
    Reject,
}

impl Decision {
    pub const ALL: [Decision; 4] = [
        Decision::AssignToQc,
        Decision::Assign,
        Decision::Approve,
        Decision::Reject,
    ];

    /// Verdict recorded in the ledger; routing decisions carry none
    pub fn review_status(self) -> Option<ReviewStatus> {
        match self {
            Decision::Approve => Some(ReviewStatus::Approved),
            Decision::Reject => Some(ReviewStatus::Rejected),
            Decision::AssignToQc | Decision::Assign => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::AssignToQc => "assign-to-qc",
            Decision::Assign => "assign",
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Technician assignment a rule requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Any,
    Unassigned,
    Assigned,
}

impl Assignment {
    pub fn matches(self, assigned: bool) -> bool {
        match self {
            Assignment::Any => true,
            Assignment::Unassigned => !assigned,
            Assignment::Assigned => assigned,
        }
    }
}

/// What a transition does to the device besides changing status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Records who routed the device into QC and when
    RouteToQc,
    /// Sets the technician and appends a technician note
    AssignTechnician,
    AppendNote {
        track: NoteTrack,
        prefix: Option<&'static str>,
    },
    /// Appends an inventory note and clears the technician
    ReleaseTechnician,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: DeviceStatus,
    pub assignment: Assignment,
    pub actor: Actor,
    pub decision: Decision,
    pub to: DeviceStatus,
    pub effect: Effect,
}

pub const REPAIR_QC_PREFIX: &str = "Repair QC:";

const fn rule(
    from: DeviceStatus,
    assignment: Assignment,
    actor: Actor,
    decision: Decision,
    to: DeviceStatus,
    effect: Effect,
) -> TransitionRule {
    TransitionRule {
        from,
        assignment,
        actor,
        decision,
        to,
        effect,
    }
}

const fn note(track: NoteTrack) -> Effect {
    Effect::AppendNote {
        track,
        prefix: None,
    }
}

const REPAIR_QC_NOTE: Effect = Effect::AppendNote {
    track: NoteTrack::Qc,
    prefix: Some(REPAIR_QC_PREFIX),
};

use self::Assignment::{Any, Assigned, Unassigned};
use crate::entities::DeviceStatus as S;

#[rustfmt::skip]
pub const TRANSITIONS: &[TransitionRule] = &[
    rule(S::Pending, Any, Actor::OrderIntake, Decision::AssignToQc, S::Qc, Effect::RouteToQc),
    // QC may inspect a device intake has not routed yet
    rule(S::Pending, Any, Actor::QcReviewer, Decision::Approve, S::Clearance, note(NoteTrack::Qc)),
    rule(S::Pending, Any, Actor::QcReviewer, Decision::Reject, S::Technician, note(NoteTrack::Qc)),
    rule(S::Qc, Any, Actor::QcReviewer, Decision::Approve, S::Clearance, note(NoteTrack::Qc)),
    rule(S::Qc, Any, Actor::QcReviewer, Decision::Reject, S::Technician, note(NoteTrack::Qc)),
    rule(S::Technician, Unassigned, Actor::TechnicianManager, Decision::Assign, S::Technician, Effect::AssignTechnician),
    rule(S::Technician, Assigned, Actor::Technician, Decision::Approve, S::Qc, note(NoteTrack::Technician)),
    rule(S::Technician, Assigned, Actor::Technician, Decision::Reject, S::Inventory, note(NoteTrack::Technician)),
    rule(S::Inventory, Any, Actor::InventoryReviewer, Decision::Approve, S::Technician, Effect::ReleaseTechnician),
    rule(S::Inventory, Any, Actor::InventoryReviewer, Decision::Reject, S::Failed, note(NoteTrack::Inventory)),
    rule(S::RepairQc, Any, Actor::RepairQcReviewer, Decision::Approve, S::Clearance, REPAIR_QC_NOTE),
    rule(S::RepairQc, Any, Actor::RepairQcReviewer, Decision::Reject, S::Technician, REPAIR_QC_NOTE),
    rule(S::Clearance, Any, Actor::ClearanceReviewer, Decision::Approve, S::Completed, note(NoteTrack::Clearance)),
    rule(S::Clearance, Any, Actor::ClearanceReviewer, Decision::Reject, S::Failed, note(NoteTrack::Clearance)),
];

/// Looks up the rule for a device in `status`; terminal statuses never match
pub fn find_rule(
    status: DeviceStatus,
    assigned: bool,
    actor: Actor,
    decision: Decision,
) -> Result<&'static TransitionRule, WorkflowError> {
    if status.is_terminal() {
        return Err(WorkflowError::InvalidTransition {
            status,
            actor,
            decision,
        });
    }

    TRANSITIONS
        .iter()
        .find(|rule| {
            rule.from == status
                && rule.actor == actor
                && rule.decision == decision
                && rule.assignment.matches(assigned)
        })
        .ok_or(WorkflowError::InvalidTransition {
            status,
            actor,
            decision,
        })
}

/// Actions available to `actor` on a device in `status`
pub fn available_decisions(status: DeviceStatus, assigned: bool, actor: Actor) -> Vec<Decision> {
    if status.is_terminal() {
        return Vec::new();
    }
    TRANSITIONS
        .iter()
        .filter(|rule| {
            rule.from == status && rule.actor == actor && rule.assignment.matches(assigned)
        })
        .map(|rule| rule.decision)
        .collect()
}
