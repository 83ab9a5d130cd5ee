//! Intake Orchestrator: sequences validation, upload, enrichment,
//! summarization, persistence, and notification for one submission.
//!
//! Control flow: Received -> Validating -> (Rejected | Uploading) ->
//! Enriching -> Summarizing -> Persisting -> Notified -> Done. Rejections
//! happen before any write; per-file faults degrade to recorded error
//! values; the claim upsert is the commit point.

pub mod handlers;
pub mod models;

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::claims::{commit_claim, ClaimRecord, ClaimStatus, DocumentDetail};
use crate::enrichment::enrich_document;
use crate::errors::AppError;
use crate::evidence::sanitize_filename;
use crate::policy::ValidationResult;
use crate::state::IntakeContext;

use models::{ClaimSubmission, UploadedFile};

/// Processes one claim submission end to end.
///
/// Returns the persisted claim record on success. `NoFilesUploaded` and
/// `InvalidPolicy` are terminal rejections issued before any upload,
/// enrichment, or persistence work.
pub async fn process_submission(
    ctx: &IntakeContext,
    submission: ClaimSubmission,
) -> Result<ClaimRecord, AppError> {
    let files: Vec<UploadedFile> = submission
        .files
        .into_iter()
        .filter(|f| !f.file_name.is_empty())
        .collect();

    if files.is_empty() {
        return Err(AppError::NoFilesUploaded);
    }

    let validation = ctx
        .policies
        .validate(&submission.name, &submission.email)
        .await;
    let ValidationResult::Valid {
        customer_id,
        policy_id,
    } = validation
    else {
        return Err(AppError::InvalidPolicy);
    };

    // Generated once per submission; also scopes every evidence storage key.
    let claim_id = Uuid::new_v4();
    info!(%claim_id, customer_id, policy_id, "Submission validated, processing {} file(s)", files.len());

    let mut documents = Vec::with_capacity(files.len());
    for file in &files {
        documents.push(process_file(ctx, claim_id, file).await);
    }

    let summary = ctx
        .summarizer
        .summarize(&submission.accident_description)
        .await;

    let claim = ClaimRecord {
        id: claim_id,
        name: submission.name,
        email: submission.email,
        customer_id,
        policy_id,
        accident_date: submission.accident_date,
        vehicle_model: submission.vehicle_model,
        description: submission.accident_description,
        documents,
        summary,
        status: ClaimStatus::Submitted,
        submitted_at: Utc::now(),
    };

    commit_claim(ctx.claims.as_ref(), ctx.notifier.as_ref(), &claim)
        .await
        .map_err(AppError::Internal)?;

    Ok(claim)
}

/// Uploads one file and runs both enrichment calls against its signed URL.
///
/// An upload failure is isolated to this file: the document entry carries an
/// error marker and no evidence URL, and the submission continues. The audit
/// insert is best-effort and never alters the in-memory result.
async fn process_file(ctx: &IntakeContext, claim_id: Uuid, file: &UploadedFile) -> DocumentDetail {
    let evidence = match ctx
        .evidence
        .upload(claim_id, &file.file_name, file.body.clone())
        .await
    {
        Ok(evidence) => evidence,
        Err(e) => {
            error!(%claim_id, file = %file.file_name, "Evidence upload failed: {e}");
            let marker = format!("Upload error: {e}");
            return DocumentDetail {
                file: sanitize_filename(&file.file_name),
                caption: marker.clone(),
                form_data: BTreeMap::from([("error".to_string(), marker)]),
                blob_url: None,
            };
        }
    };

    debug!(%claim_id, key = %evidence.storage_key, "Evidence uploaded");

    let enrichment =
        enrich_document(ctx.vision.as_ref(), ctx.analysis.as_ref(), &evidence.signed_url).await;

    if let Err(e) = ctx
        .audit
        .record_document(claim_id, file.kind, &evidence.file_name, &evidence.signed_url)
        .await
    {
        warn!(%claim_id, file = %evidence.file_name, "Audit insert failed: {e}");
    }

    DocumentDetail {
        file: evidence.file_name,
        caption: enrichment.caption,
        form_data: enrichment.form_data,
        blob_url: Some(evidence.signed_url),
    }
}
