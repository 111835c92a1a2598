use anyhow::Result;

use super::{Command, Workspace};
use crate::entities::UserId;
use crate::intake::DeviceSubmission;

pub struct OrderCommand {
    pub client_id: UserId,
    pub devices: Vec<DeviceSubmission>,
    workspace: Workspace,
}

impl OrderCommand {
    pub fn new(client_id: impl Into<UserId>, devices: Vec<DeviceSubmission>, workspace: Workspace) -> Self {
        Self {
            client_id: client_id.into(),
            devices,
            workspace,
        }
    }
}

impl Command for OrderCommand {
    async fn execute(&self) -> Result<()> {
        let mut coordinator = self.workspace.open().await?;
        let order = coordinator.place_order(&self.client_id, &self.devices)?;
        self.workspace.flush().await?;

        println!("📦 Order {} placed for {}", order.id, order.client_id);
        for device_id in &order.device_ids {
            if let Some(device) = coordinator.state().device(device_id) {
                println!("   📱 {} {} {} [{}]", device.id, device.brand, device.model, device.status);
            }
        }
        Ok(())
    }
}
