use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::action::Action;
use super::reducer::{apply, reduce, MissingTargetPolicy};
use super::state::AppState;
use crate::error::StoreError;

/// Observer notified after every successful dispatch
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait StateListener: Send + Sync {
    fn state_changed(&self, state: &AppState);
}

/// Holds the current snapshot and is the only way to change it.
///
/// Snapshots handed out by [`Store::snapshot`] are never mutated; each
/// dispatch swaps in a fresh `Arc`.
pub struct Store {
    state: Arc<AppState>,
    policy: MissingTargetPolicy,
    listeners: Vec<Box<dyn StateListener>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        Self {
            state: Arc::new(initial),
            policy: MissingTargetPolicy::default(),
            listeners: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: MissingTargetPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MissingTargetPolicy {
        self.policy
    }

    /// Shared handle to the current snapshot
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn subscribe(&mut self, listener: Box<dyn StateListener>) {
        self.listeners.push(listener);
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Arc<AppState>, StoreError> {
        let name = action.name();
        let next = reduce(&self.state, action, self.policy)?;
        debug!(action = name, "Action applied");
        Ok(self.commit(next))
    }

    /// Applies every action or none of them
    pub fn dispatch_batch(
        &mut self,
        actions: impl IntoIterator<Item = Action>,
    ) -> Result<Arc<AppState>, StoreError> {
        let mut next = AppState::clone(&self.state);
        let mut applied = 0usize;
        for action in actions {
            apply(&mut next, action, self.policy)?;
            applied += 1;
        }
        info!(actions = applied, "Batch applied");
        Ok(self.commit(next))
    }

    fn commit(&mut self, next: AppState) -> Arc<AppState> {
        self.state = Arc::new(next);
        for listener in &self.listeners {
            listener.state_changed(&self.state);
        }
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Device, DeviceId};
    use chrono::Utc;

    fn device(id: &str) -> Device {
        Device::new(id, "Samsung", "Galaxy S21", "356938035643809", "Battery", "u-1", Utc::now())
    }

    #[test]
    fn test_dispatch_notifies_listeners() {
        let mut listener = MockStateListener::new();
        listener
            .expect_state_changed()
            .withf(|state: &AppState| state.devices.len() == 1)
            .times(1)
            .return_const(());

        let mut store = Store::default();
        store.subscribe(Box::new(listener));
        store.dispatch(Action::AddDevice(device("d-1"))).unwrap();
    }

    #[test]
    fn test_failed_dispatch_notifies_nobody() {
        let mut store = Store::default();
        store.dispatch(Action::AddDevice(device("d-1"))).unwrap();

        let mut listener = MockStateListener::new();
        listener.expect_state_changed().times(0);
        store.subscribe(Box::new(listener));

        let before = store.snapshot();
        assert!(store.dispatch(Action::AddDevice(device("d-1"))).is_err());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut store = Store::default();
        let err = store.dispatch_batch(vec![
            Action::AddDevice(device("d-1")),
            Action::AddDevice(device("d-2")),
            Action::AddDevice(device("d-1")),
        ]);
        assert!(err.is_err());
        assert!(store.state().devices.is_empty());

        store
            .dispatch_batch(vec![Action::AddDevice(device("d-1")), Action::AddDevice(device("d-2"))])
            .unwrap();
        assert_eq!(store.state().devices.len(), 2);
    }

    #[test]
    fn test_earlier_snapshots_stay_valid() {
        let mut store = Store::default();
        let empty = store.snapshot();
        store.dispatch(Action::AddDevice(device("d-1"))).unwrap();
        store.dispatch(Action::DeleteDevice(DeviceId::new("d-1"))).unwrap();
        store.dispatch(Action::AddDevice(device("d-2"))).unwrap();

        assert!(empty.devices.is_empty());
        assert_eq!(store.state().devices[0].id, "d-2");
    }

    #[test]
    fn test_reject_policy_is_applied() {
        let mut store = Store::default().with_policy(MissingTargetPolicy::Reject);
        assert_eq!(store.policy(), MissingTargetPolicy::Reject);
        assert!(store.dispatch(Action::DeleteDevice(DeviceId::new("nope"))).is_err());
    }
}
