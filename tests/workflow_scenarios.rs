// End-to-end workflow scenarios driven through the engine and the store

use chrono::{Duration, TimeZone, Utc};
use refurb_tracker::ledger::ReviewCollection;
use refurb_tracker::workflow::SteppingClock;
use refurb_tracker::{
    Action, Actor, Collection, Device, DeviceId, DeviceStatus, MissingTargetPolicy, ReviewRequest,
    ReviewStage, ReviewStatus, Role, Store, StoreError, Technician, TechnicianId, User,
    WorkflowCoordinator, WorkflowEngine, WorkflowError, RefurbError,
};

fn coordinator_with(device: Device) -> WorkflowCoordinator<SteppingClock> {
    let start = Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).unwrap();
    let mut store = Store::default();
    store
        .dispatch_batch(vec![
            Action::AddTechnician(Technician::new("t-1", "Ana", "ana@refurb.example", "Boards", start)),
            Action::AddDevice(device),
        ])
        .unwrap();
    WorkflowCoordinator::with_engine(
        store,
        WorkflowEngine::with_clock(SteppingClock::new(start, Duration::minutes(5))),
    )
    .with_metrics(false)
}

fn device(status: DeviceStatus) -> Device {
    let created = Utc.with_ymd_and_hms(2024, 9, 1, 15, 30, 0).unwrap();
    Device::new("d-1", "Apple", "iPhone 13", "356938035643809", "Cracked back glass", "u-client", created)
        .with_order("o-1")
        .with_status(status)
}

fn id() -> DeviceId {
    DeviceId::new("d-1")
}

#[test]
fn scenario_a_qc_approves_pending_device() {
    let mut coordinator = coordinator_with(device(DeviceStatus::Pending));
    coordinator
        .review(&id(), Actor::QcReviewer, "u-qc", ReviewStatus::Approved, "ok")
        .unwrap();

    let state = coordinator.state();
    let device = state.device(&id()).unwrap();
    assert_eq!(device.status, DeviceStatus::Clearance);
    assert_eq!(device.qc_notes, vec!["ok"]);

    let qc = state.reviews.collection(ReviewCollection::Qc);
    assert_eq!(qc.len(), 1);
    assert_eq!(qc[0].status, ReviewStatus::Approved);
    assert_eq!(qc[0].stage, ReviewStage::Qc);
    assert_eq!(qc[0].order_id, "o-1");
    assert_eq!(qc[0].notes, "ok");
}

#[test]
fn scenario_b_qc_rejection_waits_for_assignment() {
    let mut coordinator = coordinator_with(device(DeviceStatus::Qc));
    coordinator
        .review(&id(), Actor::QcReviewer, "u-qc", ReviewStatus::Rejected, "Dead pixels")
        .unwrap();

    let state = coordinator.state();
    let device = state.device(&id()).unwrap();
    assert_eq!(device.status, DeviceStatus::Technician);
    assert!(device.technician_id.is_none());
    let qc = state.reviews.collection(ReviewCollection::Qc);
    assert_eq!(qc.len(), 1);
    assert_eq!(qc[0].status, ReviewStatus::Rejected);

    // the technician cannot act before a manager assigns the device
    let err = coordinator
        .review(&id(), Actor::Technician, "u-tech", ReviewStatus::Approved, "")
        .unwrap_err();
    assert!(err.is_invalid_transition());

    coordinator
        .assign_technician(&id(), "u-mgr", &TechnicianId::new("t-1"), "Screen swap")
        .unwrap();
    let device = coordinator.state().device(&id()).unwrap();
    assert_eq!(device.technician_id, Some(TechnicianId::new("t-1")));
    assert_eq!(device.technician_notes, vec!["Screen swap"]);
    // assignment is routing, not a verdict
    assert_eq!(coordinator.state().reviews.len(), 1);
}

#[test]
fn scenario_c_inventory_rejection_is_final() {
    let mut coordinator = coordinator_with(device(DeviceStatus::Inventory).with_technician("t-1"));
    coordinator
        .review(&id(), Actor::InventoryReviewer, "u-inv", ReviewStatus::Rejected, "No parts")
        .unwrap();

    let state = coordinator.state();
    assert_eq!(state.device(&id()).unwrap().status, DeviceStatus::Failed);
    assert_eq!(state.reviews.collection(ReviewCollection::Inventory).len(), 1);

    let before = coordinator.snapshot();
    let err = coordinator
        .review(&id(), Actor::InventoryReviewer, "u-inv", ReviewStatus::Approved, "Found parts")
        .unwrap_err();
    assert!(matches!(
        err,
        RefurbError::Workflow(WorkflowError::InvalidTransition {
            status: DeviceStatus::Failed,
            ..
        })
    ));
    assert_eq!(*before, *coordinator.state());
}

#[test]
fn scenario_d_clearance_completes_device() {
    let mut coordinator = coordinator_with(device(DeviceStatus::Clearance));
    let outcome = coordinator
        .review(&id(), Actor::ClearanceReviewer, "u-clr", ReviewStatus::Approved, "Ready to ship")
        .unwrap();

    let state = coordinator.state();
    let device = state.device(&id()).unwrap();
    assert_eq!(device.status, DeviceStatus::Completed);
    assert_eq!(device.clearance_notes, vec!["Ready to ship"]);
    assert_eq!(device.completed_at, Some(device.updated_at));
    assert_eq!(state.reviews.collection(ReviewCollection::Clearance).len(), 1);
    assert_eq!(outcome.review.unwrap().stage, ReviewStage::Clearance);
}

#[test]
fn scenario_e_duplicate_user_is_rejected() {
    let now = Utc::now();
    let mut store = Store::default();
    store
        .dispatch(Action::AddUser(User::new("u-1", "a@refurb.example", "A", Role::Client, now)))
        .unwrap();

    let err = store
        .dispatch(Action::AddUser(User::new("u-1", "b@refurb.example", "B", Role::Admin, now)))
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::DuplicateId {
            collection: Collection::Users,
            id: "u-1".to_string()
        }
    );
    assert_eq!(store.state().users.len(), 1);
}

#[test]
fn full_repair_loop_reaches_completion() {
    let mut coordinator = coordinator_with(device(DeviceStatus::Pending));
    coordinator.route_to_qc(&id(), "u-staff").unwrap();
    coordinator
        .review(&id(), Actor::QcReviewer, "u-qc", ReviewStatus::Rejected, "Battery swollen")
        .unwrap();
    coordinator
        .assign_technician(&id(), "u-mgr", &TechnicianId::new("t-1"), "")
        .unwrap();
    coordinator
        .review(&id(), Actor::Technician, "u-tech", ReviewStatus::Rejected, "Need battery")
        .unwrap();
    coordinator
        .review(&id(), Actor::InventoryReviewer, "u-inv", ReviewStatus::Approved, "Battery in stock")
        .unwrap();

    // inventory approval sends the device back to the bench unassigned
    let device = coordinator.state().device(&id()).unwrap();
    assert_eq!(device.status, DeviceStatus::Technician);
    assert!(device.technician_id.is_none());

    coordinator
        .assign_technician(&id(), "u-mgr", &TechnicianId::new("t-1"), "Install battery")
        .unwrap();
    coordinator
        .review(&id(), Actor::Technician, "u-tech", ReviewStatus::Approved, "Done")
        .unwrap();
    coordinator
        .review(&id(), Actor::QcReviewer, "u-qc", ReviewStatus::Approved, "Passes")
        .unwrap();
    coordinator
        .review(&id(), Actor::ClearanceReviewer, "u-clr", ReviewStatus::Approved, "")
        .unwrap();

    let state = coordinator.state();
    assert_eq!(state.device(&id()).unwrap().status, DeviceStatus::Completed);

    let trail: Vec<_> = state
        .reviews
        .for_device(&id())
        .iter()
        .map(|record| (record.stage, record.status))
        .collect();
    assert_eq!(
        trail,
        vec![
            (ReviewStage::Qc, ReviewStatus::Rejected),
            (ReviewStage::Technician, ReviewStatus::Rejected),
            (ReviewStage::Inventory, ReviewStatus::Approved),
            (ReviewStage::Technician, ReviewStatus::Approved),
            (ReviewStage::Qc, ReviewStatus::Approved),
            (ReviewStage::Clearance, ReviewStatus::Approved),
        ]
    );

    let workload = state.technician_workload(&TechnicianId::new("t-1")).unwrap();
    assert!(workload.assigned.is_empty());
    assert_eq!(workload.completed, 1);
}

#[test]
fn repair_qc_notes_carry_prefix() {
    let mut coordinator = coordinator_with(device(DeviceStatus::RepairQc));
    coordinator
        .transition(
            &id(),
            &ReviewRequest::reject(Actor::RepairQcReviewer, "u-rqc", "Speaker rattles"),
        )
        .unwrap();

    let state = coordinator.state();
    let device = state.device(&id()).unwrap();
    assert_eq!(device.status, DeviceStatus::Technician);
    assert_eq!(device.qc_notes, vec!["Repair QC: Speaker rattles"]);
    let records = state.reviews.by_stage(ReviewStage::RepairQc);
    assert_eq!(records.len(), 1);
    // the record keeps the reviewer's own words
    assert_eq!(records[0].notes, "Speaker rattles");
}

#[test]
fn strict_store_rejects_unknown_targets() {
    let mut store = Store::default().with_policy(MissingTargetPolicy::Reject);
    let err = store.dispatch(Action::UpdateDevice(device(DeviceStatus::Qc))).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { collection: Collection::Devices, .. }));

    let mut lenient = Store::default();
    let before = lenient.snapshot();
    lenient.dispatch(Action::UpdateDevice(device(DeviceStatus::Qc))).unwrap();
    assert_eq!(*before, *lenient.state());
}
