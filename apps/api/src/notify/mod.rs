use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::claims::ClaimRecord;

const CALL_TIMEOUT_SECS: u64 = 15;

/// Best-effort downstream notification fired after a claim is persisted.
/// Callers log a failure and move on; the claim is already committed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_submitted(&self, claim: &ClaimRecord) -> Result<()>;
}

/// POSTs the full claim JSON to a workflow webhook, when one is configured.
pub struct WebhookNotifier {
    client: Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(CALL_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_submitted(&self, claim: &ClaimRecord) -> Result<()> {
        let Some(url) = &self.url else {
            debug!("No webhook configured; skipping notification");
            return Ok(());
        };

        self.client
            .post(url)
            .json(claim)
            .send()
            .await?
            .error_for_status()?;

        info!(claim_id = %claim.id, "Workflow webhook notified");
        Ok(())
    }
}
