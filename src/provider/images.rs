//! Stock-image resolution
//!
//! The redirector answers `GET /random/<size>?<description>` with a redirect
//! to a matching photo; the final URL after redirects is the image URL.

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, error, instrument};

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

/// Resolves a text description to an image URL
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn resolve(&self, description: &str) -> AppResult<String>;
}

/// Client for a stock-image redirect endpoint
pub struct StockImageClient {
    client: reqwest::Client,
    base_url: String,
    size: String,
}

impl StockImageClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.image_api_url.trim_end_matches('/').to_string(),
            size: config.image_size.clone(),
        }
    }

    /// Build the lookup URL; the description becomes the raw query string
    fn lookup_url(&self, description: &str) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}/random/{}", self.base_url, self.size))
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid IMAGE_API_URL: {}", e)))?;
        url.set_query(Some(description.trim()));
        Ok(url)
    }
}

#[async_trait]
impl ImageSource for StockImageClient {
    #[instrument(skip(self))]
    async fn resolve(&self, description: &str) -> AppResult<String> {
        let url = self.lookup_url(description)?;

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Image lookup failed");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(url = %url, status = %status, "Image redirector returned an error");
            return Err(AppError::UpstreamError(format!(
                "Image redirector error {}",
                status
            )));
        }

        let resolved = response.url().to_string();
        // Read the body so the connection goes back to the pool
        if let Err(e) = response.bytes().await {
            debug!(error = %e, "Image body not drained");
        }
        debug!(resolved = %resolved, "Image resolved");
        Ok(resolved)
    }
}
