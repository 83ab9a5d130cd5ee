use std::sync::Arc;

use crate::claims::{AuditLog, ClaimStore};
use crate::enrichment::{DocumentAnalysisApi, VisionApi};
use crate::evidence::EvidenceStore;
use crate::llm_client::Summarizer;
use crate::notify::Notifier;
use crate::policy::PolicyStore;

/// Explicit dependency-injection context for the intake flow.
///
/// Every external collaborator sits behind a trait object so the
/// orchestrator never reaches into process-wide state and tests can swap in
/// fakes. Constructed once in `main` and shared via `AppState`.
pub struct IntakeContext {
    pub policies: Arc<dyn PolicyStore>,
    pub evidence: Arc<dyn EvidenceStore>,
    pub vision: Arc<dyn VisionApi>,
    pub analysis: Arc<dyn DocumentAnalysisApi>,
    pub summarizer: Arc<dyn Summarizer>,
    pub claims: Arc<dyn ClaimStore>,
    pub audit: Arc<dyn AuditLog>,
    pub notifier: Arc<dyn Notifier>,
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<IntakeContext>,
}
