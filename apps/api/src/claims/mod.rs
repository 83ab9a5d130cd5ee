pub mod store;

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::notify::Notifier;

/// Terminal intake status. Claims leave this service as `Submitted`;
/// any later transitions belong to downstream systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    Submitted,
}

/// Which form field an uploaded file arrived through. Recorded in the
/// relational audit table alongside the file reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Photo,
    SupportingDocument,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Photo => "Photo",
            DocumentKind::SupportingDocument => "SupportingDocument",
        }
    }
}

/// Per-file outcome carried into the claim record: the sanitized filename,
/// the caption and extracted fields (error text on degraded calls), and the
/// signed evidence URL. `blob_url` is `None` when the upload itself failed
/// and the file was recorded with an error marker instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetail {
    pub file: String,
    pub caption: String,
    pub form_data: BTreeMap<String, String>,
    pub blob_url: Option<String>,
}

/// The persisted claim document. Built once by the aggregator, upserted
/// exactly once, immutable afterwards as far as this service is concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub customer_id: i64,
    pub policy_id: i64,
    pub accident_date: String,
    pub vehicle_model: String,
    pub description: String,
    pub documents: Vec<DocumentDetail>,
    pub summary: String,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Document-store contract for claim records.
/// `upsert` is insert-or-replace at the claim id, safe to retry.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    async fn upsert(&self, claim: &ClaimRecord) -> Result<()>;
}

/// Relational audit trail: one row per uploaded file.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record_document(
        &self,
        claim_id: Uuid,
        kind: DocumentKind,
        file_name: &str,
        file_url: &str,
    ) -> Result<()>;
}

/// Persists the claim and fires the downstream notification.
///
/// The upsert is the commit point: if it fails, no claim exists anywhere and
/// the error propagates. Past that point the webhook is best-effort; a
/// notification failure is logged but never reverses the persisted claim.
pub async fn commit_claim(
    store: &dyn ClaimStore,
    notifier: &dyn Notifier,
    claim: &ClaimRecord,
) -> Result<()> {
    store.upsert(claim).await?;
    info!(claim_id = %claim.id, "Claim record persisted");

    if let Err(e) = notifier.notify_submitted(claim).await {
        warn!(claim_id = %claim.id, "Downstream webhook notification failed: {e}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_submitted() {
        let json = serde_json::to_string(&ClaimStatus::Submitted).unwrap();
        assert_eq!(json, "\"Submitted\"");
    }

    #[test]
    fn test_claim_record_uses_camel_case_keys() {
        let claim = ClaimRecord {
            id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            customer_id: 1,
            policy_id: 2,
            accident_date: "2026-08-01".to_string(),
            vehicle_model: "Corolla".to_string(),
            description: "Rear-ended at a stop light".to_string(),
            documents: vec![],
            summary: "Rear-end collision".to_string(),
            status: ClaimStatus::Submitted,
            submitted_at: Utc::now(),
        };
        let value = serde_json::to_value(&claim).unwrap();
        assert!(value.get("customerId").is_some());
        assert!(value.get("policyId").is_some());
        assert!(value.get("accidentDate").is_some());
        assert_eq!(value["status"], "Submitted");
    }
}
