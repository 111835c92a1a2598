use anyhow::Result;

use super::{Command, Workspace};
use crate::entities::{DeviceId, UserId};
use crate::ledger::{ReviewLedger, ReviewRecord, ReviewStatus};

pub struct HistoryCommand {
    pub device_id: Option<DeviceId>,
    pub reviewer_id: Option<UserId>,
    workspace: Workspace,
}

impl HistoryCommand {
    pub fn new(device_id: Option<DeviceId>, reviewer_id: Option<UserId>, workspace: Workspace) -> Self {
        Self {
            device_id,
            reviewer_id,
            workspace,
        }
    }
}

/// Records matching both filters, oldest first
fn select_records<'a>(
    ledger: &'a ReviewLedger,
    device_id: Option<&DeviceId>,
    reviewer_id: Option<&UserId>,
) -> Vec<&'a ReviewRecord> {
    let mut records = match (device_id, reviewer_id) {
        (Some(device_id), _) => ledger.for_device(device_id),
        (None, Some(reviewer_id)) => ledger.by_reviewer(reviewer_id),
        (None, None) => ledger.iter().collect(),
    };
    if let Some(reviewer_id) = reviewer_id {
        records.retain(|record| &record.reviewer_id == reviewer_id);
    }
    records.sort_by_key(|record| record.created_at);
    records
}

impl Command for HistoryCommand {
    async fn execute(&self) -> Result<()> {
        let state = self.workspace.load_state().await?;
        let records = select_records(
            &state.reviews,
            self.device_id.as_ref(),
            self.reviewer_id.as_ref(),
        );

        if records.is_empty() {
            println!("📜 No review records");
            return Ok(());
        }

        println!("📜 REVIEW HISTORY ({} records)", records.len());
        println!("────────────────────");
        for record in records {
            let icon = match record.status {
                ReviewStatus::Approved => "✅",
                ReviewStatus::Rejected => "❌",
            };
            println!(
                "{icon} {} {} {} by {} on {}",
                record.created_at.format("%Y-%m-%d %H:%M:%S"),
                record.stage,
                record.status,
                record.reviewer_id,
                record.device_id
            );
            if !record.notes.is_empty() {
                println!("   📝 {}", record.notes);
            }
        }
        Ok(())
    }
}
