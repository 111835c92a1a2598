use anyhow::{bail, Result};

use super::{Command, Workspace};
use crate::seed::seed_state;
use crate::workflow::SystemClock;

pub struct InitCommand {
    pub force: bool,
    workspace: Workspace,
}

impl InitCommand {
    pub fn new(force: bool, workspace: Workspace) -> Self {
        Self { force, workspace }
    }
}

impl Command for InitCommand {
    async fn execute(&self) -> Result<()> {
        let path = self.workspace.state_file();
        if !self.workspace.persistence_enabled() {
            bail!("Persistence is disabled (storage.enable_persistence = false); nothing to initialize");
        }
        if path.exists() && !self.force {
            bail!(
                "Snapshot {} already exists. Use --force to replace it.",
                path.display()
            );
        }

        let state = seed_state(&SystemClock);
        self.workspace.save(&state).await?;

        println!("✅ Initialized snapshot at {}", path.display());
        println!("   👤 Users: {}", state.users.len());
        for user in &state.users {
            println!("      {} ({}, {})", user.id, user.name, user.role);
        }
        println!("   🔧 Technicians: {}", state.technicians.len());
        for technician in &state.technicians {
            println!("      {} ({})", technician.id, technician.name);
        }
        Ok(())
    }
}
