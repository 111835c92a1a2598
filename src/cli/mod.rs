use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::intake::DeviceSubmission;
use crate::ledger::ReviewStatus;
use crate::workflow::Actor;

pub mod commands;

#[derive(Parser)]
#[command(name = "refurb-tracker")]
#[command(about = "Device refurbishment workflow tracker")]
#[command(long_about = "Tracks client devices through QC, bench repair, inventory and clearance, \
                       keeping an append-only trail of every review decision. Start with \
                       'refurb-tracker init' to create a snapshot file.")]
pub struct Cli {
    /// Snapshot file to operate on (overrides storage.state_file)
    #[arg(long, global = true, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a snapshot seeded with starter users and technicians
    Init {
        /// Overwrite an existing snapshot
        #[arg(long, help = "Replace the snapshot file if it already exists")]
        force: bool,
    },
    /// Show devices per status, order progress and technician workload
    Status {
        /// Only this client's devices and orders
        #[arg(long)]
        client: Option<String>,
    },
    /// Submit a new order of devices for a client
    Order {
        /// Client placing the order
        #[arg(long)]
        client: String,
        /// Device as "brand,model,imei,issue"; repeat for each device
        #[arg(long = "device", required = true, value_parser = parse_submission)]
        devices: Vec<DeviceSubmission>,
    },
    /// Send a pending device to QC
    Route {
        device: String,
        /// Staff member doing the routing
        #[arg(long)]
        staff: String,
    },
    /// Hand a device waiting at the bench to a technician
    Assign {
        device: String,
        #[arg(long)]
        technician: String,
        /// Manager making the assignment
        #[arg(long)]
        manager: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Approve or reject a device at a review stage
    Review {
        device: String,
        #[arg(long, value_enum)]
        stage: StageArg,
        #[arg(long)]
        reviewer: String,
        #[arg(long, value_enum)]
        verdict: VerdictArg,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List review records, oldest first
    History {
        /// Only records for this device
        #[arg(long)]
        device: Option<String>,
        /// Only records filed by this reviewer
        #[arg(long)]
        reviewer: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    Qc,
    Technician,
    Inventory,
    RepairQc,
    Clearance,
}

impl From<StageArg> for Actor {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Qc => Actor::QcReviewer,
            StageArg::Technician => Actor::Technician,
            StageArg::Inventory => Actor::InventoryReviewer,
            StageArg::RepairQc => Actor::RepairQcReviewer,
            StageArg::Clearance => Actor::ClearanceReviewer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VerdictArg {
    Approve,
    Reject,
}

impl From<VerdictArg> for ReviewStatus {
    fn from(verdict: VerdictArg) -> Self {
        match verdict {
            VerdictArg::Approve => ReviewStatus::Approved,
            VerdictArg::Reject => ReviewStatus::Rejected,
        }
    }
}

/// Parses "brand,model,imei,issue"; the issue may itself contain commas
pub fn parse_submission(raw: &str) -> Result<DeviceSubmission, String> {
    let parts: Vec<&str> = raw.splitn(4, ',').map(str::trim).collect();
    match parts.as_slice() {
        [brand, model, imei, issue] => Ok(DeviceSubmission::new(*brand, *model, *imei, *issue)),
        _ => Err(format!("expected \"brand,model,imei,issue\", got \"{raw}\"")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submission_keeps_commas_in_issue() {
        let submission = parse_submission("Apple, iPhone 12, 356938035643809, Screen cracked, no touch").unwrap();
        assert_eq!(submission.brand, "Apple");
        assert_eq!(submission.imei, "356938035643809");
        assert_eq!(submission.issue, "Screen cracked, no touch");
        assert!(parse_submission("Apple,iPhone").is_err());
    }

    #[test]
    fn test_review_args_parse() {
        let cli = Cli::try_parse_from([
            "refurb-tracker",
            "review",
            "d-1",
            "--stage",
            "repair-qc",
            "--reviewer",
            "u-1",
            "--verdict",
            "reject",
            "--state-file",
            "snap.json",
        ])
        .unwrap();
        assert_eq!(cli.state_file, Some(PathBuf::from("snap.json")));
        match cli.command {
            Some(Commands::Review { stage, verdict, .. }) => {
                assert_eq!(Actor::from(stage), Actor::RepairQcReviewer);
                assert_eq!(ReviewStatus::from(verdict), ReviewStatus::Rejected);
            }
            _ => panic!("expected review command"),
        }
    }

    #[test]
    fn test_history_and_status_filters_parse() {
        let cli = Cli::try_parse_from(["refurb-tracker", "history", "--reviewer", "u-qc"]).unwrap();
        match cli.command {
            Some(Commands::History { device, reviewer }) => {
                assert!(device.is_none());
                assert_eq!(reviewer.as_deref(), Some("u-qc"));
            }
            _ => panic!("expected history command"),
        }

        let cli = Cli::try_parse_from(["refurb-tracker", "status", "--client", "client-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Status { client: Some(ref client) }) if client == "client-1"
        ));
    }
}
