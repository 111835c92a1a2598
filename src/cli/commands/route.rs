use anyhow::Result;

use super::{print_outcome, Command, Workspace};
use crate::entities::{DeviceId, UserId};

pub struct RouteCommand {
    pub device_id: DeviceId,
    pub staff_id: UserId,
    workspace: Workspace,
}

impl RouteCommand {
    pub fn new(device_id: impl Into<DeviceId>, staff_id: impl Into<UserId>, workspace: Workspace) -> Self {
        Self {
            device_id: device_id.into(),
            staff_id: staff_id.into(),
            workspace,
        }
    }
}

impl Command for RouteCommand {
    async fn execute(&self) -> Result<()> {
        let mut coordinator = self.workspace.open().await?;
        let outcome = coordinator.route_to_qc(&self.device_id, self.staff_id.clone())?;
        self.workspace.flush().await?;
        print_outcome(&outcome);
        Ok(())
    }
}
