use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::database::DatabaseManager;
use crate::services::sync::SyncService;

#[derive(Subcommand)]
pub enum SyncCommands {
    #[command(about = "Materialize missing sales deals now")]
    Run,

    #[command(about = "Show collection counts and the latest run")]
    Status,
}

pub async fn handle(cmd: SyncCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::main_pool().await?;
    let service = SyncService::with_pool(pool);

    match cmd {
        SyncCommands::Run => {
            let run = service.run("cli").await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
                OutputFormat::Text => println!(
                    "Sync finished: examined {}, created {}, skipped {}, failed {}",
                    run.examined, run.created, run.skipped, run.failed
                ),
            }
        }
        SyncCommands::Status => {
            let status = service.status().await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
                OutputFormat::Text => {
                    println!(
                        "Finance deals: {}\nSales deals:   {}\nUnsynced VINs: {}",
                        status.finance_deals, status.sales_deals, status.unsynced
                    );
                    match status.last_run {
                        Some(run) => println!(
                            "Last run {} ({}): created {}, skipped {}, failed {}",
                            run.id, run.triggered_by, run.created, run.skipped, run.failed
                        ),
                        None => println!("No sync run recorded yet."),
                    }
                }
            }
        }
    }
    Ok(())
}
