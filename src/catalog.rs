//! Hugging Face model catalog: list GGUF repositories and their files.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

pub const HF_BASE: &str = "https://huggingface.co";
pub const DEFAULT_AUTHOR: &str = "TheBloke";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogModel {
    pub id: String,
    pub name: String,
    pub downloads: u64,
    pub likes: u64,
    /// Date part (`YYYY-MM-DD`) of the last modification, empty if unknown.
    pub last_modified: String,
}

pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(HF_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("arcadia/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// GGUF repositories by `author` matching `search`, most downloaded first.
    pub async fn list_gguf_models(&self, author: &str, search: &str) -> Result<Vec<CatalogModel>> {
        let url = url::Url::parse_with_params(
            &format!("{}/api/models", self.base_url),
            &[("author", author), ("search", search)],
        )?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("catalog request failed")?;
        anyhow::ensure!(
            response.status().is_success(),
            "Hugging Face returned HTTP {}",
            response.status()
        );

        let body: Value = response.json().await.context("catalog response is not JSON")?;
        let models = parse_models(&body);
        tracing::info!(author = %author, count = models.len(), "catalog listed");
        Ok(models)
    }

    /// `.gguf` file paths in the `main` branch of `model_id`.
    pub async fn list_model_files(&self, model_id: &str) -> Result<Vec<String>> {
        let url = format!("{}/api/models/{model_id}/tree/main", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        anyhow::ensure!(
            response.status().is_success(),
            "Hugging Face returned HTTP {} for {model_id}",
            response.status()
        );

        let body: Value = response.json().await.context("tree response is not JSON")?;
        Ok(parse_tree(&body))
    }

    pub fn download_url(&self, model_id: &str, file: &str) -> String {
        format!("{}/{model_id}/resolve/main/{file}", self.base_url)
    }
}

/// Accepts either a bare array or `{"models": [...]}`; keeps entries whose id contains
/// "gguf" (case-insensitive) and sorts by downloads, descending.
pub fn parse_models(body: &Value) -> Vec<CatalogModel> {
    let entries = body
        .get("models")
        .and_then(Value::as_array)
        .or_else(|| body.as_array());
    let Some(entries) = entries else {
        return Vec::new();
    };

    let mut models: Vec<CatalogModel> = entries
        .iter()
        .filter_map(|m| {
            let id = m
                .get("modelId")
                .or_else(|| m.get("id"))
                .and_then(Value::as_str)?;
            if !id.to_lowercase().contains("gguf") {
                return None;
            }
            let last_modified = m
                .get("lastModified")
                .and_then(Value::as_str)
                .and_then(|s| s.split('T').next())
                .unwrap_or_default();
            Some(CatalogModel {
                id: id.to_string(),
                name: id.rsplit('/').next().unwrap_or(id).to_string(),
                downloads: m.get("downloads").and_then(Value::as_u64).unwrap_or(0),
                likes: m.get("likes").and_then(Value::as_u64).unwrap_or(0),
                last_modified: last_modified.to_string(),
            })
        })
        .collect();

    models.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    models
}

/// Paths of `type == "file"` entries ending in `.gguf`.
pub fn parse_tree(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|e| e.get("type").and_then(Value::as_str) == Some("file"))
                .filter_map(|e| e.get("path").and_then(Value::as_str))
                .filter(|p| p.ends_with(".gguf"))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
