use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::RefurbConfig;
use crate::entities::Device;
use crate::intake::OrderIntake;
use crate::persistence::{FileSystemPersistence, PersistenceConfig, SnapshotTracker, StatePersistence};
use crate::store::{AppState, MissingTargetPolicy, Store};
use crate::workflow::{available_decisions, Actor, Decision, TransitionOutcome, WorkflowCoordinator};

pub mod assign;
pub mod history;
pub mod init;
pub mod order;
pub mod review;
pub mod route;
pub mod status;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Where the snapshot lives and how the store behaves, resolved from
/// configuration and command-line flags
#[derive(Debug, Clone)]
pub struct Workspace {
    persistence: FileSystemPersistence,
    enabled: bool,
    policy: MissingTargetPolicy,
    imei_length: usize,
    metrics_enabled: bool,
    pending: SnapshotTracker,
}

impl Workspace {
    pub fn from_config(config: &RefurbConfig, state_file: Option<&Path>) -> Self {
        let mut persistence = config.persistence_config();
        if let Some(path) = state_file {
            persistence.state_file = path.to_path_buf();
        }
        Self::new(persistence, config)
    }

    fn new(persistence: PersistenceConfig, config: &RefurbConfig) -> Self {
        Self {
            enabled: persistence.enabled,
            persistence: FileSystemPersistence::new(persistence),
            policy: config.store_policy(),
            imei_length: config.workflow.imei_length,
            metrics_enabled: config.observability.metrics_enabled,
            pending: SnapshotTracker::new(),
        }
    }

    pub fn state_file(&self) -> &PathBuf {
        self.persistence.state_file()
    }

    pub fn persistence_enabled(&self) -> bool {
        self.enabled
    }

    /// Reads the saved snapshot. With persistence disabled every run starts
    /// from an empty state.
    pub async fn load_state(&self) -> Result<AppState> {
        let loaded = self
            .persistence
            .load_snapshot()
            .await
            .with_context(|| format!("Failed to read snapshot {}", self.state_file().display()))?;
        match loaded {
            Some(state) => Ok(state),
            None if !self.enabled => {
                warn!("Persistence disabled, starting from an empty state");
                Ok(AppState::default())
            }
            None => bail!(
                "No snapshot at {}. Run 'refurb-tracker init' first.",
                self.state_file().display()
            ),
        }
    }

    /// Loads the snapshot into a coordinator whose store reports every
    /// change back to this workspace; [`Workspace::flush`] writes it out.
    pub async fn open(&self) -> Result<WorkflowCoordinator> {
        let state = self.load_state().await?;
        let mut store = Store::new(state).with_policy(self.policy);
        store.subscribe(Box::new(self.pending.clone()));
        Ok(WorkflowCoordinator::new(store)
            .with_intake(OrderIntake::new(self.imei_length))
            .with_metrics(self.metrics_enabled))
    }

    pub async fn save(&self, state: &AppState) -> Result<()> {
        self.persistence
            .save_snapshot(state)
            .await
            .with_context(|| format!("Failed to write snapshot {}", self.state_file().display()))
    }

    /// Saves the newest snapshot dispatched since `open`. Returns whether
    /// anything was written.
    pub async fn flush(&self) -> Result<bool> {
        match self.pending.take() {
            Some(state) => {
                self.save(&state).await?;
                Ok(true)
            }
            None => {
                debug!("No state changes to save");
                Ok(false)
            }
        }
    }
}

pub(crate) fn print_outcome(outcome: &TransitionOutcome) {
    println!(
        "✅ Device {}: {} → {}",
        outcome.device.id, outcome.from, outcome.to
    );
    if let Some(technician) = &outcome.device.technician_id {
        println!("   🔧 Technician: {technician}");
    }
    if let Some(review) = &outcome.review {
        println!("   📝 Review {} recorded ({} {})", review.id, review.stage, review.status);
    }
    for (actor, decisions) in next_steps(&outcome.device) {
        let decisions: Vec<_> = decisions.iter().map(|decision| decision.as_str()).collect();
        println!("   ➡️  {actor}: {}", decisions.join(", "));
    }
}

/// Who can act on the device next, and how
fn next_steps(device: &Device) -> Vec<(Actor, Vec<Decision>)> {
    let assigned = device.technician_id.is_some();
    Actor::ALL
        .iter()
        .map(|actor| (*actor, available_decisions(device.status, assigned, *actor)))
        .filter(|(_, decisions)| !decisions.is_empty())
        .collect()
}

pub async fn show_how_to_get_started() -> Result<()> {
    println!("📱 refurb-tracker - Device Refurbishment Workflow");
    println!();
    println!("To get started:");
    println!("  ⚙️  refurb-tracker init                 # Create a seeded snapshot");
    println!("  📦 refurb-tracker order --client <id>  # Submit devices");
    println!("  📊 refurb-tracker status               # See where every device is");
    println!();
    println!("Workflow commands:");
    println!("  🔀 refurb-tracker route <device>       # Send a pending device to QC");
    println!("  🔧 refurb-tracker assign <device>      # Give a device to a technician");
    println!("  ✅ refurb-tracker review <device>      # Approve or reject at a stage");
    println!("  📜 refurb-tracker history              # Review trail");
    Ok(())
}
