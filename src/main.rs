use anyhow::Result;
use clap::Parser;

use refurb_tracker::cli::commands::{
    assign::AssignCommand, history::HistoryCommand, init::InitCommand, order::OrderCommand,
    review::ReviewCommand, route::RouteCommand, show_how_to_get_started, status::StatusCommand,
    Command, Workspace,
};
use refurb_tracker::cli::{Cli, Commands};
use refurb_tracker::{config, init_telemetry, time_operation, workflow_metrics};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config()?;
    init_telemetry(&config.observability)?;
    let workspace = Workspace::from_config(config, cli.state_file.as_deref());

    let result = match cli.command {
        // No subcommand: explain how to get started
        None => tokio::runtime::Runtime::new()?.block_on(async { show_how_to_get_started().await }),
        Some(Commands::Init { force }) => tokio::runtime::Runtime::new()?.block_on(async {
            InitCommand::new(force, workspace).execute().await
        }),
        Some(Commands::Status { client }) => tokio::runtime::Runtime::new()?.block_on(async {
            StatusCommand::new(client.map(Into::into), workspace).execute().await
        }),
        Some(Commands::Order { client, devices }) => {
            tokio::runtime::Runtime::new()?.block_on(async {
                time_operation!("order");
                OrderCommand::new(client, devices, workspace).execute().await
            })
        }
        Some(Commands::Route { device, staff }) => {
            tokio::runtime::Runtime::new()?.block_on(async {
                time_operation!("route");
                RouteCommand::new(device, staff, workspace).execute().await
            })
        }
        Some(Commands::Assign {
            device,
            technician,
            manager,
            notes,
        }) => tokio::runtime::Runtime::new()?.block_on(async {
            time_operation!("assign");
            AssignCommand::new(device, technician, manager, notes, workspace)
                .execute()
                .await
        }),
        Some(Commands::Review {
            device,
            stage,
            reviewer,
            verdict,
            notes,
        }) => tokio::runtime::Runtime::new()?.block_on(async {
            time_operation!("review");
            ReviewCommand::new(device, stage.into(), reviewer, verdict.into(), notes, workspace)
                .execute()
                .await
        }),
        Some(Commands::History { device, reviewer }) => tokio::runtime::Runtime::new()?.block_on(async {
            HistoryCommand::new(device.map(Into::into), reviewer.map(Into::into), workspace)
                .execute()
                .await
        }),
    };

    if config.observability.metrics_enabled {
        workflow_metrics().log_stats();
    }
    result
}
