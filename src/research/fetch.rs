//! Page fetching for the research pipeline.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the body as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain GET with the client's timeout and user agent.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()?;
        response
            .text()
            .await
            .with_context(|| format!("reading body of {url} failed"))
    }
}
