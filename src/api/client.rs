use super::{unwrap_envelope, ApiError, DownloadApi};
use crate::config::ApiConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the upstream "all-in-one" downloader endpoint.
pub struct AllInOneClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl AllInOneClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|source| ApiError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    fn request_url(&self, video_url: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("link", video_url)
            .append_pair("apikey", &self.api_key);
        url
    }
}

#[async_trait]
impl DownloadApi for AllInOneClient {
    fn name(&self) -> &'static str {
        "all-in-one"
    }

    async fn fetch(&self, video_url: &str) -> Result<Value, ApiError> {
        info!("Resolving {} via {}", video_url, self.endpoint);

        let response = self
            .http
            .get(self.request_url(video_url))
            .send()
            .await
            .map_err(|e| {
                warn!("Upstream request failed: {}", e);
                ApiError::fetch_failed(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream returned HTTP {}", status);
            return Err(ApiError::fetch_failed(format!("HTTP {status}")));
        }

        let body: Value = response.json().await.map_err(|e| {
            warn!("Upstream body is not valid JSON: {}", e);
            ApiError::fetch_failed(e)
        })?;
        debug!("Upstream JSON: {}", body);

        unwrap_envelope(body)
    }
}
