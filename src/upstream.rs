//! Client for the third-party random-activity service

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::UpstreamConfig;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Source of randomly suggested activities. The body is relayed to the
/// client untouched, so it stays an opaque JSON value.
#[async_trait]
pub trait ActivityProvider: Send + Sync {
    async fn random_activity(&self) -> Result<Value, UpstreamError>;
}

pub struct HttpActivityProvider {
    client: reqwest::Client,
    url: url::Url,
}

impl HttpActivityProvider {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let url = url::Url::parse(&config.random_activity_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.random_activity_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl ActivityProvider for HttpActivityProvider {
    async fn random_activity(&self) -> Result<Value, UpstreamError> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response.json::<Value>().await?;
        tracing::debug!("Random activity from upstream: {}", body);
        Ok(body)
    }
}
