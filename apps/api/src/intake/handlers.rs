use axum::{
    extract::{Multipart, State},
    response::Html,
    Json,
};
use serde_json::{json, Value};

use crate::claims::DocumentKind;
use crate::errors::AppError;
use crate::state::AppState;

use super::models::{in_submission_order, ClaimSubmission, UploadedFile};
use super::process_submission;

/// Minimal intake form. Real deployments front this service with their own
/// portal; the form exists so the endpoint is exercisable from a browser.
const INTAKE_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><title>Claim Intake</title></head>
<body>
  <h1>Submit a claim</h1>
  <form action="/submit-claim" method="post" enctype="multipart/form-data">
    <p><label>Name <input name="name" required></label></p>
    <p><label>Email <input name="email" type="email" required></label></p>
    <p><label>Accident date <input name="accidentDate" type="date" required></label></p>
    <p><label>Vehicle model <input name="vehicleModel" required></label></p>
    <p><label>What happened? <textarea name="accidentDescription" required></textarea></label></p>
    <p><label>Car photos <input name="carPhotos" type="file" multiple></label></p>
    <p><label>Supporting documents <input name="supportingDocuments" type="file" multiple></label></p>
    <p><button type="submit">Submit claim</button></p>
  </form>
</body>
</html>
"#;

/// GET /
pub async fn handle_intake_form() -> Html<&'static str> {
    Html(INTAKE_FORM)
}

/// POST /submit-claim
pub async fn handle_submit_claim(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let submission = parse_submission(multipart).await?;
    let claim = process_submission(&state.ctx, submission).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Claim submitted successfully.",
        "claim_id": claim.id
    })))
}

/// Pulls the form fields and file parts out of the multipart body. Files
/// are ordered car photos first, then supporting documents. Missing text
/// fields default to empty strings; the orchestrator rejects anything that
/// matters (no files, unknown claimant).
async fn parse_submission(mut multipart: Multipart) -> Result<ClaimSubmission, AppError> {
    let mut name = String::new();
    let mut email = String::new();
    let mut accident_description = String::new();
    let mut accident_date = String::new();
    let mut vehicle_model = String::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        let read_text = |e: axum::extract::multipart::MultipartError| {
            AppError::BadRequest(format!("Unreadable field '{field_name}': {e}"))
        };

        match field_name.as_str() {
            "name" => name = field.text().await.map_err(read_text)?,
            "email" => email = field.text().await.map_err(read_text)?,
            "accidentDescription" => {
                accident_description = field.text().await.map_err(read_text)?
            }
            "accidentDate" => accident_date = field.text().await.map_err(read_text)?,
            "vehicleModel" => vehicle_model = field.text().await.map_err(read_text)?,
            "carPhotos" | "supportingDocuments" => {
                let kind = if field_name == "carPhotos" {
                    DocumentKind::Photo
                } else {
                    DocumentKind::SupportingDocument
                };
                let file_name = field.file_name().unwrap_or_default().to_string();
                let body = field.bytes().await.map_err(read_text)?;
                files.push(UploadedFile {
                    kind,
                    file_name,
                    body,
                });
            }
            _ => {} // unknown fields are ignored
        }
    }

    Ok(ClaimSubmission {
        name,
        email,
        accident_description,
        accident_date,
        vehicle_model,
        files: in_submission_order(files),
    })
}
