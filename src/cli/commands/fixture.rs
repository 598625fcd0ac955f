use clap::Subcommand;
use rust_decimal::Decimal;

use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::DealContact;
use crate::database::DatabaseManager;
use crate::services::deals::{DealInput, DealService};

#[derive(Subcommand)]
pub enum FixtureCommands {
    #[command(about = "Seed demo dealers and finance deals")]
    Seed {
        #[arg(long, help = "Also create a back-office user with this email")]
        admin_email: Option<String>,
        #[arg(long, requires = "admin_email", help = "Password for the created user")]
        admin_password: Option<String>,
    },
}

/// Demo deals carry the messy historical stage/priority spellings on
/// purpose, so a seeded database exercises the normalizer end to end.
fn demo_deals() -> Vec<DealInput> {
    vec![
        DealInput {
            vin: Some("1HGCM82633A004352".to_string()),
            year: Some(2021),
            make: Some("Honda".to_string()),
            model: Some("Accord".to_string()),
            purchase_price: Some(Decimal::new(19_500_00, 2)),
            list_price: Some(Decimal::new(22_900_00, 2)),
            wholesale_price: None,
            seller: Some(DealContact {
                name: Some("Dana Whitfield".to_string()),
                contact_type: Some("dealer".to_string()),
                organization: Some("Lakeside Auto Group".to_string()),
                email: Some("dana@lakeside.example.com".to_string()),
                phone: Some("555-0100".to_string()),
                address: None,
            }),
            buyer: Some(DealContact::named("Jordan Brooks")),
            current_stage: Some("funds_disbursed".to_string()),
            priority: Some("normal".to_string()),
            dealer_name: Some("Lakeside Auto Group".to_string()),
        },
        DealInput {
            vin: Some("2T1BURHE0JC123456".to_string()),
            year: Some(2018),
            make: Some("Toyota".to_string()),
            model: Some("Corolla".to_string()),
            purchase_price: Some(Decimal::new(12_000_00, 2)),
            list_price: None,
            wholesale_price: Some(Decimal::new(10_500_00, 2)),
            seller: None,
            buyer: None, // document generation must refuse this one
            current_stage: Some("purchased".to_string()),
            priority: Some("high".to_string()),
            dealer_name: Some("Hilltop Motors".to_string()),
        },
        DealInput {
            vin: Some("1FTFW1ET5DFC10312".to_string()),
            year: Some(2013),
            make: Some("Ford".to_string()),
            model: Some("F-150".to_string()),
            purchase_price: Some(Decimal::new(22_500_00, 2)),
            list_price: Some(Decimal::new(24_000_00, 2)),
            wholesale_price: None,
            seller: Some(DealContact::named("Pat Alvarez")),
            buyer: Some(DealContact::named("N/A")), // placeholder name from the legacy import
            current_stage: Some("under_review".to_string()),
            priority: Some("rush".to_string()),
            dealer_name: None,
        },
    ]
}

pub async fn handle(cmd: FixtureCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        FixtureCommands::Seed {
            admin_email,
            admin_password,
        } => {
            let pool = DatabaseManager::main_pool().await?;
            let deals = DealService::with_pool(pool.clone());

            let mut seeded = 0usize;
            for input in demo_deals() {
                deals.create(input).await?;
                seeded += 1;
            }

            let mut user_created = false;
            if let (Some(email), Some(password)) = (admin_email, admin_password) {
                let cost = config::config().security.bcrypt_cost;
                let hash = bcrypt::hash(password, cost)?;
                let result = sqlx::query(
                    r#"
                    INSERT INTO users (id, email, name, password_hash, role)
                    VALUES ($1, $2, $3, $4, 'admin')
                    ON CONFLICT (email) DO NOTHING
                    "#,
                )
                .bind(uuid::Uuid::new_v4())
                .bind(email.trim())
                .bind("Seed Admin")
                .bind(&hash)
                .execute(&pool)
                .await?;
                user_created = result.rows_affected() > 0;
            }

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "deals_seeded": seeded, "user_created": user_created })
                ),
                OutputFormat::Text => {
                    println!("Seeded {} demo deals (dealers auto-created from intake).", seeded);
                    if user_created {
                        println!("Created admin user.");
                    }
                }
            }
            Ok(())
        }
    }
}
