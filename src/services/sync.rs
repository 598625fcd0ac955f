use chrono::Utc;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use std::collections::HashSet;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{FinanceDeal, SyncRun};
use crate::sync::materializer::plan_materialization;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Database manager error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
pub struct SyncStatus {
    pub finance_deals: i64,
    pub sales_deals: i64,
    pub unsynced: i64,
    pub last_run: Option<SyncRun>,
}

pub struct SyncService {
    pool: PgPool,
}

impl SyncService {
    pub async fn new() -> Result<Self, SyncError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn status(&self) -> Result<SyncStatus, SyncError> {
        let (finance_deals,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM finance_deals")
            .fetch_one(&self.pool)
            .await?;
        let (sales_deals,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sales_deals")
            .fetch_one(&self.pool)
            .await?;
        let (unsynced,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM finance_deals f
            WHERE f.vin IS NOT NULL
              AND NOT EXISTS (SELECT 1 FROM sales_deals s WHERE s.vin = f.vin)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let last_run = sqlx::query_as::<_, SyncRun>(
            "SELECT * FROM sync_runs ORDER BY finished_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(SyncStatus {
            finance_deals,
            sales_deals,
            unsynced,
            last_run,
        })
    }

    /// Materialize sales deals for every finance deal whose VIN has none.
    /// Per-record failures are logged and counted, never fatal; the UNIQUE
    /// index on sales_deals.vin absorbs races with concurrent runs.
    pub async fn run(&self, triggered_by: &str) -> Result<SyncRun, SyncError> {
        let started_at = Utc::now();

        let finance_deals = sqlx::query_as::<_, FinanceDeal>(
            "SELECT * FROM finance_deals ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let existing: Vec<(String,)> = sqlx::query_as("SELECT vin FROM sales_deals")
            .fetch_all(&self.pool)
            .await?;
        let existing_vins: HashSet<String> = existing.into_iter().map(|(v,)| v).collect();

        let plan = plan_materialization(&finance_deals, &existing_vins, started_at);
        tracing::info!("sync plan: {}", plan.summary());

        for failure in &plan.failed {
            tracing::warn!("sync: deal {} not materialized: {}", failure.deal_id, failure.reason);
        }

        let mut created: i64 = 0;
        let mut skipped: i64 = plan.skipped.len() as i64;
        let mut failed: i64 = plan.failed.len() as i64;

        for planned in &plan.to_create {
            let result = sqlx::query(
                r#"
                INSERT INTO sales_deals
                    (id, vin, source_deal_id, year, make, model, purchase_price, list_price,
                     current_stage, priority, stage_history, customer)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (vin) DO NOTHING
                "#,
            )
            .bind(planned.id)
            .bind(&planned.vin)
            .bind(planned.source_deal_id)
            .bind(planned.year)
            .bind(&planned.make)
            .bind(&planned.model)
            .bind(planned.purchase_price)
            .bind(planned.list_price)
            .bind(planned.current_stage.as_str())
            .bind(planned.priority.as_str())
            .bind(Json(&planned.initial_history))
            .bind(planned.customer.clone().map(Json))
            .execute(&self.pool)
            .await;

            match result {
                Ok(done) if done.rows_affected() == 0 => {
                    // lost a race with a concurrent run; the invariant held
                    skipped += 1;
                }
                Ok(_) => created += 1,
                Err(e) => {
                    tracing::warn!("sync: insert failed for VIN {}: {}", planned.vin, e);
                    failed += 1;
                }
            }
        }

        let run = sqlx::query_as::<_, SyncRun>(
            r#"
            INSERT INTO sync_runs
                (id, examined, created, skipped, failed, triggered_by, started_at, finished_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plan.examined as i64)
        .bind(created)
        .bind(skipped)
        .bind(failed)
        .bind(triggered_by)
        .bind(started_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            "sync run {}: examined={} created={} skipped={} failed={}",
            run.id,
            run.examined,
            run.created,
            run.skipped,
            run.failed
        );
        Ok(run)
    }
}
