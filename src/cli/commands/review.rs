use anyhow::Result;

use super::{print_outcome, Command, Workspace};
use crate::entities::{DeviceId, UserId};
use crate::ledger::ReviewStatus;
use crate::workflow::Actor;

pub struct ReviewCommand {
    pub device_id: DeviceId,
    pub actor: Actor,
    pub reviewer_id: UserId,
    pub verdict: ReviewStatus,
    pub notes: String,
    workspace: Workspace,
}

impl ReviewCommand {
    pub fn new(
        device_id: impl Into<DeviceId>,
        actor: Actor,
        reviewer_id: impl Into<UserId>,
        verdict: ReviewStatus,
        notes: String,
        workspace: Workspace,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            actor,
            reviewer_id: reviewer_id.into(),
            verdict,
            notes,
            workspace,
        }
    }
}

impl Command for ReviewCommand {
    async fn execute(&self) -> Result<()> {
        let mut coordinator = self.workspace.open().await?;
        let outcome = coordinator.review(
            &self.device_id,
            self.actor,
            self.reviewer_id.clone(),
            self.verdict,
            self.notes.as_str(),
        )?;
        self.workspace.flush().await?;
        print_outcome(&outcome);
        Ok(())
    }
}
