use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EnrichmentError;

const ANALYZE_PATH: &str = "/formrecognizer/documentModels/prebuilt-document:analyze";
const API_VERSION: &str = "2023-07-31";
const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const CALL_TIMEOUT_SECS: u64 = 30;
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLLS: u32 = 30;

/// Structured key/value extraction over a fetchable document URL.
/// Implementations return trimmed keys and values with empty keys dropped.
#[async_trait]
pub trait DocumentAnalysisApi: Send + Sync {
    async fn extract_fields(
        &self,
        document_url: &str,
    ) -> Result<BTreeMap<String, String>, EnrichmentError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    url_source: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeStatus {
    status: String,
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResult {
    #[serde(default)]
    key_value_pairs: Vec<KeyValuePair>,
}

#[derive(Debug, Deserialize)]
struct KeyValuePair {
    key: Option<Content>,
    value: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    content: String,
}

/// Client for an Azure-style async document-analysis endpoint: submit the
/// URL, get 202 + an operation location, then poll until a terminal status.
pub struct DocumentIntelligenceClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DocumentIntelligenceClient {
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

    async fn begin_analysis(&self, document_url: &str) -> Result<String, EnrichmentError> {
        let url = format!(
            "{}{}?api-version={}",
            self.endpoint, ANALYZE_PATH, API_VERSION
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&AnalyzeRequest {
                url_source: document_url,
            })
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

        response
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| {
                EnrichmentError::Malformed("Missing operation-location header".to_string())
            })
    }

    async fn poll_result(&self, operation_url: &str) -> Result<AnalyzeResult, EnrichmentError> {
        for poll in 0..MAX_POLLS {
            if poll > 0 {
                tokio::time::sleep(POLL_INTERVAL).await;
            }

            let response = self
                .client
                .get(operation_url)
                .header(API_KEY_HEADER, &self.api_key)
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

            let parsed: AnalyzeStatus = response.json().await?;
            debug!("Document analysis poll {poll}: {}", parsed.status);

            match parsed.status.as_str() {
                "succeeded" => {
                    return parsed.analyze_result.ok_or_else(|| {
                        EnrichmentError::Malformed("Succeeded without a result".to_string())
                    });
                }
                "failed" => {
                    return Err(EnrichmentError::Malformed(
                        "Analysis reported failure".to_string(),
                    ));
                }
                _ => continue,
            }
        }

        Err(EnrichmentError::PollTimeout { polls: MAX_POLLS })
    }
}

#[async_trait]
impl DocumentAnalysisApi for DocumentIntelligenceClient {
    async fn extract_fields(
        &self,
        document_url: &str,
    ) -> Result<BTreeMap<String, String>, EnrichmentError> {
        let operation_url = self.begin_analysis(document_url).await?;
        let result = self.poll_result(&operation_url).await?;

        Ok(clean_field_pairs(result.key_value_pairs.into_iter().map(
            |kv| {
                (
                    kv.key.map(|c| c.content).unwrap_or_default(),
                    kv.value.map(|c| c.content).unwrap_or_default(),
                )
            },
        )))
    }
}

/// Trims keys and values and drops pairs whose key trims to empty.
pub fn clean_field_pairs(
    pairs: impl IntoIterator<Item = (String, String)>,
) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .filter_map(|(key, value)| {
            let key = key.trim();
            if key.is_empty() {
                None
            } else {
                Some((key.to_string(), value.trim().to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_are_trimmed() {
        let fields = clean_field_pairs(vec![(
            "  Policy Number ".to_string(),
            " POL-123 ".to_string(),
        )]);
        assert_eq!(fields.get("Policy Number").map(String::as_str), Some("POL-123"));
    }

    #[test]
    fn test_empty_keys_dropped() {
        let fields = clean_field_pairs(vec![
            ("   ".to_string(), "orphan value".to_string()),
            ("".to_string(), "another".to_string()),
            ("Date".to_string(), "2026-08-01".to_string()),
        ]);
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("Date"));
    }

    #[test]
    fn test_empty_values_kept() {
        let fields = clean_field_pairs(vec![("Signature".to_string(), "  ".to_string())]);
        assert_eq!(fields.get("Signature").map(String::as_str), Some(""));
    }
}
