//! Document Enricher: per-file caption and key/value extraction.
//!
//! Both sub-operations run against the file's signed URL and are isolated
//! from each other and from the rest of the submission. A failing call is
//! folded into the result as error text, never a hard error.

pub mod analysis;
pub mod vision;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

pub use analysis::DocumentAnalysisApi;
pub use vision::VisionApi;

/// Sentinel caption when the vision service returns no description.
pub const NO_CAPTION: &str = "No caption detected";

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Analysis did not complete after {polls} polls")]
    PollTimeout { polls: u32 },

    #[error("Malformed API response: {0}")]
    Malformed(String),
}

/// Combined outcome of both enrichment calls for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentResult {
    pub caption: String,
    pub form_data: BTreeMap<String, String>,
}

/// Runs both enrichment calls on one signed URL, degrading each failure to
/// a recorded error value. Never returns an error: a caption failure still
/// leaves field extraction running and vice versa.
pub async fn enrich_document(
    vision: &dyn VisionApi,
    analysis: &dyn DocumentAnalysisApi,
    signed_url: &str,
) -> EnrichmentResult {
    let caption = match vision.describe(signed_url).await {
        Ok(Some(text)) => text,
        Ok(None) => NO_CAPTION.to_string(),
        Err(e) => {
            warn!("Caption extraction failed: {e}");
            format!("Vision error: {e}")
        }
    };

    let form_data = match analysis.extract_fields(signed_url).await {
        Ok(fields) => fields,
        Err(e) => {
            warn!("Field extraction failed: {e}");
            BTreeMap::from([("error".to_string(), format!("Recognizer error: {e}"))])
        }
    };

    EnrichmentResult { caption, form_data }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    struct FixedVision {
        caption: Option<String>,
    }

    #[async_trait]
    impl VisionApi for FixedVision {
        async fn describe(&self, _image_url: &str) -> Result<Option<String>, EnrichmentError> {
            Ok(self.caption.clone())
        }
    }

    struct FailingVision;

    #[async_trait]
    impl VisionApi for FailingVision {
        async fn describe(&self, _image_url: &str) -> Result<Option<String>, EnrichmentError> {
            Err(EnrichmentError::Api {
                status: 500,
                message: "vision down".to_string(),
            })
        }
    }

    struct FixedAnalysis;

    #[async_trait]
    impl DocumentAnalysisApi for FixedAnalysis {
        async fn extract_fields(
            &self,
            _document_url: &str,
        ) -> Result<BTreeMap<String, String>, EnrichmentError> {
            Ok(BTreeMap::from([(
                "Claim Number".to_string(),
                "C-9".to_string(),
            )]))
        }
    }

    struct FailingAnalysis;

    #[async_trait]
    impl DocumentAnalysisApi for FailingAnalysis {
        async fn extract_fields(
            &self,
            _document_url: &str,
        ) -> Result<BTreeMap<String, String>, EnrichmentError> {
            Err(EnrichmentError::PollTimeout { polls: 30 })
        }
    }

    #[tokio::test]
    async fn test_missing_caption_maps_to_sentinel() {
        let vision = FixedVision { caption: None };
        let result = enrich_document(&vision, &FixedAnalysis, "https://evidence.test/a.jpg").await;

        // Nothing to describe is not an error: fields still come through.
        assert_eq!(result.caption, NO_CAPTION);
        assert_eq!(result.form_data.get("Claim Number").map(String::as_str), Some("C-9"));
    }

    #[tokio::test]
    async fn test_vision_failure_becomes_error_text() {
        let result =
            enrich_document(&FailingVision, &FixedAnalysis, "https://evidence.test/a.jpg").await;

        assert!(result.caption.starts_with("Vision error:"));
        assert!(result.caption.contains("vision down"));
        assert_eq!(result.form_data.len(), 1);
        assert!(result.form_data.contains_key("Claim Number"));
    }

    #[tokio::test]
    async fn test_analysis_failure_becomes_error_marker() {
        let vision = FixedVision {
            caption: Some("a dented bumper".to_string()),
        };
        let result =
            enrich_document(&vision, &FailingAnalysis, "https://evidence.test/a.jpg").await;

        assert_eq!(result.caption, "a dented bumper");
        assert_eq!(result.form_data.len(), 1);
        assert!(result.form_data["error"].starts_with("Recognizer error:"));
    }

    #[tokio::test]
    async fn test_both_calls_degrade_independently() {
        let result =
            enrich_document(&FailingVision, &FailingAnalysis, "https://evidence.test/a.jpg").await;

        assert!(result.caption.starts_with("Vision error:"));
        assert!(result.form_data["error"].starts_with("Recognizer error:"));
    }
}
