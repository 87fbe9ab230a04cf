//! Remote disposable-email detector client.
//!
//! POSTs `{"email": ...}` to the configured endpoint and expects
//! `{"is_disposable": bool, "confidence": <scalar>}`. The HTTP client
//! carries a hard timeout so the pipeline's screening stage can never
//! block a submission indefinitely.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::classifier::Classification;
use crate::error::ClassifierError;

/// Public detector endpoint used when `CLASSIFIER_URL` is not set.
pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://disposable-e-mail-address-detector.onrender.com/api/check";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Remote classifier configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CLASSIFIER_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClassifierConfig {
    /// Build config from `CLASSIFIER_URL` / `CLASSIFIER_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let url =
            std::env::var("CLASSIFIER_URL").unwrap_or_else(|_| DEFAULT_CLASSIFIER_URL.to_string());

        let timeout_secs: u64 = std::env::var("CLASSIFIER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Wire format of the detector's verdict.
#[derive(Debug, Deserialize)]
struct RemoteVerdict {
    is_disposable: bool,
    #[serde(default)]
    confidence: serde_json::Value,
}

/// HTTP client for the remote detector.
pub struct RemoteClassifier {
    client: reqwest::Client,
    url: String,
}

impl RemoteClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Ask the remote detector about one address.
    ///
    /// Fallible by design — the fallback decorator turns any error here
    /// into a degraded denylist verdict.
    pub async fn check(&self, email: &str) -> Result<Classification, ClassifierError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifierError::Status(response.status().as_u16()));
        }

        let verdict: RemoteVerdict = response
            .json()
            .await
            .map_err(|e| ClassifierError::Decode(e.to_string()))?;

        debug!(
            is_disposable = verdict.is_disposable,
            "Remote classifier verdict"
        );
        Ok(Classification::remote(
            verdict.is_disposable,
            verdict.confidence,
        ))
    }
}
