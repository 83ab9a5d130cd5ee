use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EnrichmentError;

const DESCRIBE_PATH: &str = "/vision/v3.2/describe";
const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const CALL_TIMEOUT_SECS: u64 = 30;

/// Caption extraction over a fetchable image URL. `Ok(None)` means the
/// service answered but found nothing to say, which is not an error.
#[async_trait]
pub trait VisionApi: Send + Sync {
    async fn describe(&self, image_url: &str) -> Result<Option<String>, EnrichmentError>;
}

#[derive(Debug, Serialize)]
struct DescribeRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeResponse {
    description: Description,
}

#[derive(Debug, Deserialize)]
struct Description {
    #[serde(default)]
    captions: Vec<Caption>,
}

#[derive(Debug, Deserialize)]
struct Caption {
    text: String,
    confidence: f64,
}

/// Client for an Azure-style image description endpoint.
pub struct AzureVisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AzureVisionClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(CALL_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl VisionApi for AzureVisionClient {
    async fn describe(&self, image_url: &str) -> Result<Option<String>, EnrichmentError> {
        let url = format!("{}{}?maxCandidates=1", self.endpoint, DESCRIBE_PATH);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&DescribeRequest { url: image_url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: DescribeResponse = response.json().await?;
        let caption = parsed.description.captions.into_iter().next();

        if let Some(c) = &caption {
            debug!("Caption (confidence {:.2}): {}", c.confidence, c.text);
        }

        Ok(caption.map(|c| c.text))
    }
}
