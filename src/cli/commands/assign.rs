use anyhow::Result;

use super::{print_outcome, Command, Workspace};
use crate::entities::{DeviceId, TechnicianId, UserId};

pub struct AssignCommand {
    pub device_id: DeviceId,
    pub technician_id: TechnicianId,
    pub manager_id: UserId,
    pub notes: String,
    workspace: Workspace,
}

impl AssignCommand {
    pub fn new(
        device_id: impl Into<DeviceId>,
        technician_id: impl Into<TechnicianId>,
        manager_id: impl Into<UserId>,
        notes: String,
        workspace: Workspace,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            technician_id: technician_id.into(),
            manager_id: manager_id.into(),
            notes,
            workspace,
        }
    }
}

impl Command for AssignCommand {
    async fn execute(&self) -> Result<()> {
        let mut coordinator = self.workspace.open().await?;
        let outcome = coordinator.assign_technician(
            &self.device_id,
            self.manager_id.clone(),
            &self.technician_id,
            self.notes.as_str(),
        )?;
        self.workspace.flush().await?;
        print_outcome(&outcome);
        Ok(())
    }
}
