use anyhow::Result;
use chrono::Utc;

use super::{Command, Workspace};
use crate::entities::{Device, DeviceStatus, UserId};
use crate::ledger::ReviewStatus;
use crate::store::AppState;

pub struct StatusCommand {
    pub client_id: Option<UserId>,
    workspace: Workspace,
}

impl StatusCommand {
    pub fn new(client_id: Option<UserId>, workspace: Workspace) -> Self {
        Self { client_id, workspace }
    }
}

/// Devices at the bench that no technician holds yet
fn awaiting_assignment(state: &AppState) -> Vec<&Device> {
    state
        .devices_with_status(DeviceStatus::Technician)
        .filter(|device| device.technician_id.is_none())
        .collect()
}

fn show_client(state: &AppState, client_id: &UserId) {
    println!("👤 CLIENT {client_id}");
    println!("────────────────────");
    let devices: Vec<_> = state.devices_for_client(client_id).collect();
    if devices.is_empty() {
        println!("   No devices for this client");
        return;
    }
    for device in devices {
        println!(
            "   {} {} {} ({}): {}",
            device.id,
            device.brand,
            device.model,
            device.imei,
            device.status
        );
    }
    for order in state.orders.iter().filter(|order| &order.client_id == client_id) {
        if let Some(progress) = state.order_progress(&order.id) {
            println!(
                "   📦 {}: {}/{} completed, {} failed",
                order.id, progress.completed, progress.total, progress.failed
            );
        }
    }
}

impl Command for StatusCommand {
    async fn execute(&self) -> Result<()> {
        let state = self.workspace.load_state().await?;
        if let Some(client_id) = &self.client_id {
            show_client(&state, client_id);
            return Ok(());
        }

        println!("📱 REFURBISHMENT STATUS");
        println!("=======================");
        println!();

        println!("📊 DEVICES BY STATUS:");
        println!("────────────────────");
        for (status, count) in state.status_counts() {
            println!("   {:<12} {count}", status.as_str());
        }
        println!("   {:<12} {}", "total", state.devices.len());
        println!();

        println!("📦 ORDERS:");
        println!("────────────────────");
        if state.orders.is_empty() {
            println!("   No orders yet");
        }
        for order in &state.orders {
            if let Some(progress) = state.order_progress(&order.id) {
                let marker = if progress.is_finished() { "🏁" } else { "⏳" };
                println!(
                    "   {marker} {} ({}): {}/{} completed, {} failed, {} in progress",
                    order.id,
                    order.client_id,
                    progress.completed,
                    progress.total,
                    progress.failed,
                    progress.in_progress
                );
            }
        }
        println!();

        println!("🔧 TECHNICIANS:");
        println!("────────────────────");
        for technician in &state.technicians {
            if let Some(workload) = state.technician_workload(&technician.id) {
                println!(
                    "   {} ({}): {} assigned, {} completed",
                    technician.id,
                    technician.name,
                    workload.assigned.len(),
                    workload.completed
                );
            }
        }
        let waiting = awaiting_assignment(&state);
        if !waiting.is_empty() {
            println!("   ⏳ Awaiting assignment:");
            for device in waiting {
                println!("      {} {} {}", device.id, device.brand, device.model);
            }
        }
        println!();

        let today = Utc::now().date_naive();
        println!("📝 REVIEWS:");
        println!("────────────────────");
        println!("   Total recorded: {}", state.reviews.len());
        println!(
            "   Today: {} approved, {} rejected",
            state.reviews.count_on(today, ReviewStatus::Approved, None),
            state.reviews.count_on(today, ReviewStatus::Rejected, None)
        );
        Ok(())
    }
}
