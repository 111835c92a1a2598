// The reducer: prior snapshot + action -> new snapshot
//
// `reduce` clones the prior state and applies the action to the clone, so a
// failed action leaves every earlier snapshot exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::action::Action;
use super::state::{AppState, DASHBOARD_PAGE, LOGIN_PAGE};
use crate::entities::{Device, Entity, TechnicianId};
use crate::error::{Collection, StoreError, ValidationError};
use crate::ledger::ReviewCollection;

/// What an update or delete does when its target id is unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTargetPolicy {
    /// Leave the state unchanged and log a warning
    #[default]
    Ignore,
    /// Fail with `StoreError::NotFound`
    Reject,
}

pub fn reduce(
    prior: &AppState,
    action: Action,
    policy: MissingTargetPolicy,
) -> Result<AppState, StoreError> {
    let mut next = prior.clone();
    apply(&mut next, action, policy)?;
    Ok(next)
}

/// Applies one action in place. Only called on a private copy of the state.
pub(crate) fn apply(
    state: &mut AppState,
    action: Action,
    policy: MissingTargetPolicy,
) -> Result<(), StoreError> {
    debug!(action = action.name(), "Reducing action");

    match action {
        Action::Login(user) => {
            state.is_authenticated = true;
            state.current_user = Some(user);
            state.current_page = DASHBOARD_PAGE.to_string();
        }
        Action::Logout => {
            state.is_authenticated = false;
            state.current_user = None;
            state.current_page = LOGIN_PAGE.to_string();
        }
        Action::Navigate(page) => {
            state.current_page = page;
        }

        Action::AddDevice(device) => {
            device.validate()?;
            insert(&mut state.devices, device)?;
        }
        Action::UpdateDevice(device) => {
            device.validate()?;
            ensure_not_reopened(state, &device)?;
            replace(&mut state.devices, device, policy)?;
        }
        Action::DeleteDevice(id) => remove(&mut state.devices, id.as_str(), policy)?,

        Action::AddOrder(order) => {
            order.validate()?;
            insert(&mut state.orders, order)?;
        }
        Action::UpdateOrder(order) => {
            order.validate()?;
            replace(&mut state.orders, order, policy)?;
        }

        Action::AddTechnician(technician) => {
            technician.validate()?;
            insert(&mut state.technicians, technician)?;
        }
        Action::UpdateTechnician(technician) => {
            technician.validate()?;
            replace(&mut state.technicians, technician, policy)?;
        }
        Action::DeleteTechnician(id) => {
            ensure_no_active_devices(state, &id)?;
            remove(&mut state.technicians, id.as_str(), policy)?;
        }

        Action::AddReport(report) => {
            report.validate()?;
            insert(&mut state.reports, report)?;
        }
        Action::UpdateReport(report) => {
            report.validate()?;
            replace(&mut state.reports, report, policy)?;
        }

        Action::AddQcReview(record) => state.reviews.append(ReviewCollection::Qc, record)?,
        Action::AddTechnicianReview(record) => {
            state.reviews.append(ReviewCollection::Technician, record)?
        }
        Action::AddClearanceReview(record) => {
            state.reviews.append(ReviewCollection::Clearance, record)?
        }
        Action::AddInventoryReview(record) => {
            state.reviews.append(ReviewCollection::Inventory, record)?
        }

        Action::UpdateSettings(patch) => state.settings.merge(&patch),
        Action::UpdateRoleTheme { role, theme } => {
            state.settings.role_themes.set(role, theme);
            if state.current_user.as_ref().map(|user| user.role) == Some(role) {
                state.settings.theme = theme;
            }
        }
        Action::UpdateUser(patch) => {
            let Some(current) = state.current_user.as_mut() else {
                return missing(Collection::Users, "<current user>", policy);
            };
            let Some(entry) = state.users.iter_mut().find(|user| user.id == current.id) else {
                return missing(Collection::Users, current.id.as_str(), policy);
            };
            current.apply_patch(&patch);
            current.validate()?;
            *entry = current.clone();
        }
        Action::AddUser(user) => {
            user.validate()?;
            insert(&mut state.users, user)?;
        }
        Action::DeleteUser(id) => {
            remove(&mut state.users, id.as_str(), policy)?;
            if state.current_user.as_ref().is_some_and(|user| user.id == id) {
                state.is_authenticated = false;
                state.current_user = None;
                state.current_page = LOGIN_PAGE.to_string();
            }
        }
    }

    Ok(())
}

fn insert<T: Entity>(items: &mut Vec<T>, item: T) -> Result<(), StoreError> {
    if items.iter().any(|existing| existing.entity_id() == item.entity_id()) {
        return Err(StoreError::DuplicateId {
            collection: T::COLLECTION,
            id: item.entity_id().to_string(),
        });
    }
    items.push(item);
    Ok(())
}

fn replace<T: Entity>(
    items: &mut [T],
    item: T,
    policy: MissingTargetPolicy,
) -> Result<(), StoreError> {
    match items
        .iter_mut()
        .find(|existing| existing.entity_id() == item.entity_id())
    {
        Some(slot) => {
            *slot = item;
            Ok(())
        }
        None => missing(T::COLLECTION, item.entity_id(), policy),
    }
}

fn remove<T: Entity>(
    items: &mut Vec<T>,
    id: &str,
    policy: MissingTargetPolicy,
) -> Result<(), StoreError> {
    match items.iter().position(|existing| existing.entity_id() == id) {
        Some(index) => {
            items.remove(index);
            Ok(())
        }
        None => missing(T::COLLECTION, id, policy),
    }
}

fn missing(collection: Collection, id: &str, policy: MissingTargetPolicy) -> Result<(), StoreError> {
    match policy {
        MissingTargetPolicy::Ignore => {
            warn!(%collection, id, "Update target not found, state left unchanged");
            Ok(())
        }
        MissingTargetPolicy::Reject => Err(StoreError::NotFound {
            collection,
            id: id.to_string(),
        }),
    }
}

/// Completed and failed devices keep their status for good
fn ensure_not_reopened(state: &AppState, device: &Device) -> Result<(), StoreError> {
    match state.device(&device.id) {
        Some(stored) if stored.status.is_terminal() && stored.status != device.status => {
            Err(ValidationError::new(
                "device.status",
                format!("{} is {} and cannot move to {}", device.id, stored.status, device.status),
            )
            .into())
        }
        _ => Ok(()),
    }
}

fn ensure_no_active_devices(state: &AppState, id: &TechnicianId) -> Result<(), StoreError> {
    let active = state
        .devices
        .iter()
        .filter(|device| device.technician_id.as_ref() == Some(id) && !device.status.is_terminal())
        .count();
    if active > 0 {
        return Err(ValidationError::new(
            "technician",
            format!("{id} still holds {active} active device(s)"),
        )
        .into());
    }
    Ok(())
}
