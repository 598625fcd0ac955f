use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::database::{schema, DatabaseManager};

#[derive(Subcommand)]
pub enum InitCommands {
    #[command(about = "Create any missing tables and indexes")]
    Schema,
}

pub async fn handle(cmd: InitCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        InitCommands::Schema => {
            let pool = DatabaseManager::main_pool().await?;
            schema::ensure_schema(&pool).await?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::json!({ "schema": "ok" })),
                OutputFormat::Text => println!("Schema is up to date."),
            }
            Ok(())
        }
    }
}
