use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AuditLog, ClaimRecord, ClaimStore, DocumentKind};

/// Claim records live in a single JSONB-bodied table keyed by claim id,
/// which gives the document-store contract (upsert at id) on Postgres.
pub struct PgClaimStore {
    pool: PgPool,
}

impl PgClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClaimStore for PgClaimStore {
    async fn upsert(&self, claim: &ClaimRecord) -> Result<()> {
        let body = serde_json::to_value(claim).context("Failed to serialize claim record")?;

        sqlx::query(
            r#"
            INSERT INTO claims (id, body, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (id) DO UPDATE SET body = EXCLUDED.body
            "#,
        )
        .bind(claim.id)
        .bind(body)
        .execute(&self.pool)
        .await
        .context("Claim upsert failed")?;

        Ok(())
    }
}

/// Relational audit trail writer. One row per uploaded file.
pub struct PgAuditLog {
    pool: PgPool,
}

impl PgAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for PgAuditLog {
    async fn record_document(
        &self,
        claim_id: Uuid,
        kind: DocumentKind,
        file_name: &str,
        file_url: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO claim_documents (claim_id, document_type, file_name, file_url)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(claim_id)
        .bind(kind.as_str())
        .bind(file_name)
        .bind(file_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
