use sqlx::PgPool;

use crate::database::manager::DatabaseError;

/// Idempotent DDL for the back-office tables. Applied by `dealdesk init schema`
/// rather than at server startup, so operators control when shape changes land.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'staff',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dealers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        contact_person TEXT,
        phone TEXT,
        email TEXT,
        address TEXT,
        total_deals BIGINT NOT NULL DEFAULT 0,
        total_volume NUMERIC NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS finance_deals (
        id UUID PRIMARY KEY,
        vin TEXT,
        year INT,
        make TEXT,
        model TEXT,
        purchase_price NUMERIC,
        list_price NUMERIC,
        wholesale_price NUMERIC,
        seller JSONB,
        buyer JSONB,
        current_stage TEXT NOT NULL,
        priority TEXT NOT NULL,
        dealer_name TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS finance_deals_vin_idx ON finance_deals (vin)",
    // One sales deal per VIN. The index is what makes concurrent
    // materializer runs safe; check-then-insert alone is not.
    r#"
    CREATE TABLE IF NOT EXISTS sales_deals (
        id UUID PRIMARY KEY,
        vin TEXT NOT NULL UNIQUE,
        source_deal_id UUID,
        year INT,
        make TEXT,
        model TEXT,
        purchase_price NUMERIC,
        list_price NUMERIC,
        current_stage TEXT NOT NULL,
        priority TEXT NOT NULL,
        stage_history JSONB NOT NULL DEFAULT '[]',
        sales_person JSONB,
        customer JSONB,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        id UUID PRIMARY KEY,
        deal_id UUID NOT NULL,
        vin TEXT,
        doc_type TEXT NOT NULL,
        buyer JSONB,
        seller JSONB,
        body TEXT NOT NULL,
        generated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS documents_deal_idx ON documents (deal_id)",
    r#"
    CREATE TABLE IF NOT EXISTS upload_tokens (
        id UUID PRIMARY KEY,
        token_digest TEXT NOT NULL UNIQUE,
        deal_id UUID NOT NULL,
        seller_email TEXT NOT NULL,
        upload_attempts INT NOT NULL DEFAULT 0,
        max_upload_attempts INT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        expires_at TIMESTAMPTZ NOT NULL,
        uploaded_files JSONB NOT NULL DEFAULT '[]',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sync_runs (
        id UUID PRIMARY KEY,
        examined BIGINT NOT NULL,
        created BIGINT NOT NULL,
        skipped BIGINT NOT NULL,
        failed BIGINT NOT NULL,
        triggered_by TEXT NOT NULL,
        started_at TIMESTAMPTZ NOT NULL,
        finished_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Create any missing tables and indexes
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("Schema ensured ({} statements)", SCHEMA_STATEMENTS.len());
    Ok(())
}
