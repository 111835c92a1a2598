// Device workflow: transition table, pure engine and the coordinator that
// feeds engine outcomes into the store

pub mod clock;
pub mod coordinator;
pub mod engine;
pub mod transitions;

pub use clock::{Clock, FixedClock, SteppingClock, SystemClock};
pub use coordinator::WorkflowCoordinator;
pub use engine::{ReviewRequest, TransitionOutcome, WorkflowEngine, ROUTED_TO_QC};
pub use transitions::{available_decisions, find_rule, Actor, Assignment, Decision, TransitionRule, TRANSITIONS};
