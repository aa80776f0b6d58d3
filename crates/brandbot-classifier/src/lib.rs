// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the natural-language completion service.
//!
//! Provides [`HttpClassifier`], which handles request construction,
//! authentication, and transient-error retry. Every failure surfaces as
//! `BrandbotError::Classifier`; callers treat that as non-fatal and fall
//! back to the local heuristic.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use brandbot_config::ClassifierConfig;
use brandbot_core::BrandbotError;
use brandbot_core::traits::IntentClassifier;

/// Request body sent to the completion endpoint.
#[derive(Debug, Clone, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    max_tokens: u32,
}

/// Response body returned by the completion endpoint.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    text: String,
}

/// Error body the service returns on failures, when it returns one.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for the completion service.
///
/// Manages authentication headers, connection pooling, and retry logic for
/// transient errors (429, 500, 503): one retry after a 1-second delay.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
    max_retries: u32,
}

impl HttpClassifier {
    /// Build a classifier from config. Returns `None` when no endpoint is
    /// configured, which disables classification entirely.
    pub fn from_config(config: &ClassifierConfig) -> Result<Option<Self>, BrandbotError> {
        let Some(ref endpoint) = config.endpoint else {
            return Ok(None);
        };

        let mut headers = HeaderMap::new();
        if let Some(ref api_key) = config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                BrandbotError::Config(format!("invalid classifier API key header value: {e}"))
            })?;
            headers.insert("authorization", value);
        }
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BrandbotError::Classifier {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Some(Self {
            client,
            endpoint: endpoint.clone(),
            model: config.model.clone(),
            max_retries: 1,
        }))
    }

    /// Overrides the endpoint (for testing with wiremock).
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl IntentClassifier for HttpClassifier {
    async fn classify(&self, prompt: &str) -> Result<String, BrandbotError> {
        let request = CompletionRequest {
            prompt,
            model: self.model.as_deref(),
            max_tokens: 200,
        };

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying classifier request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(&request)
                .send()
                .await
                .map_err(|e| BrandbotError::Classifier {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "classifier response received");

            if status.is_success() {
                let body: CompletionResponse =
                    response.json().await.map_err(|e| BrandbotError::Classifier {
                        message: format!("malformed completion response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(body.text);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(BrandbotError::Classifier {
                    message: format!("service returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!("completion service error: {}", api_err.error.message)
            } else {
                format!("service returned {status}: {body}")
            };
            return Err(BrandbotError::Classifier {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| BrandbotError::Classifier {
            message: "classifier request failed after retries".into(),
            source: None,
        }))
    }
}

fn is_transient_error(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
    )
}
