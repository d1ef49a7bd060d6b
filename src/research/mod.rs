//! Deep research: scrape several search engines, keep one hit per host, and read the
//! top pages.
//!
//! Backends are queried concurrently and their hit lists are merged by the calling task
//! once every backend has settled, in backend order. Individual backend or page
//! failures are logged and skipped; only a total backend failure turns into
//! [`ResearchOutcome::Failed`].

pub mod analysis;
pub mod backends;
pub mod fetch;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;

use crate::config::ResearchConfig;
use backends::{Brave, DuckDuckGo, SearchBackend};
use fetch::{HttpFetcher, PageFetcher};

/// A raw anchor scraped from a search results page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

/// An analysed page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Visible page text, truncated.
    #[serde(rename = "text")]
    pub text_excerpt: String,
    /// Fraction of query words found in the excerpt.
    pub relevance: f64,
    pub entities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResearchOutcome {
    Completed {
        query: String,
        results: Vec<SearchResult>,
        count: usize,
    },
    Failed {
        error: String,
        results: Vec<SearchResult>,
    },
}

impl ResearchOutcome {
    fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
            results: Vec::new(),
        }
    }
}

/// Limits applied by [`Researcher`].
#[derive(Debug, Clone, Copy)]
pub struct ResearchLimits {
    pub hits_per_backend: usize,
    pub max_pages: usize,
    pub excerpt_chars: usize,
}

impl From<&ResearchConfig> for ResearchLimits {
    fn from(config: &ResearchConfig) -> Self {
        Self {
            hits_per_backend: config.hits_per_backend,
            max_pages: config.max_pages,
            excerpt_chars: config.excerpt_chars,
        }
    }
}

pub struct Researcher {
    backends: Vec<Arc<dyn SearchBackend>>,
    fetcher: Arc<dyn PageFetcher>,
    limits: ResearchLimits,
}

impl Researcher {
    pub fn new(
        backends: Vec<Arc<dyn SearchBackend>>,
        fetcher: Arc<dyn PageFetcher>,
        limits: ResearchLimits,
    ) -> Self {
        Self {
            backends,
            fetcher,
            limits,
        }
    }

    /// DuckDuckGo + Brave over one shared HTTP client with the configured timeout.
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;

        let backends: Vec<Arc<dyn SearchBackend>> = vec![
            Arc::new(DuckDuckGo::new(client.clone())),
            Arc::new(Brave::new(client.clone())),
        ];
        let fetcher = Arc::new(HttpFetcher::new(client));

        Ok(Self::new(backends, fetcher, config.into()))
    }

    pub async fn research(&self, query: &str) -> ResearchOutcome {
        let limit = self.limits.hits_per_backend;
        let searches = self.backends.iter().map(|backend| async move {
            (backend.name().to_string(), backend.search(query, limit).await)
        });
        let settled = join_all(searches).await;

        let mut hits = Vec::new();
        let mut errors = Vec::new();
        for (name, outcome) in settled {
            match outcome {
                Ok(found) => {
                    tracing::debug!(backend = %name, hits = found.len(), "backend answered");
                    hits.extend(found.into_iter().take(limit));
                }
                Err(e) => {
                    tracing::warn!(backend = %name, error = %e, "search backend failed");
                    errors.push(format!("{name}: {e}"));
                }
            }
        }

        if !self.backends.is_empty() && errors.len() == self.backends.len() {
            return ResearchOutcome::failed(errors.join("; "));
        }

        let unique = analysis::dedup_by_host(hits);
        let pages = unique
            .into_iter()
            .take(self.limits.max_pages)
            .map(|hit| self.analyse(query, hit));
        let results: Vec<SearchResult> = join_all(pages).await.into_iter().flatten().collect();

        tracing::info!(query = %query, results = results.len(), "research complete");
        ResearchOutcome::Completed {
            query: query.to_string(),
            count: results.len(),
            results,
        }
    }

    async fn analyse(&self, query: &str, hit: SearchHit) -> Option<SearchResult> {
        let html = match self.fetcher.fetch(&hit.url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %hit.url, error = %e, "skipping unreadable page");
                return None;
            }
        };

        let text = analysis::visible_text(&html, self.limits.excerpt_chars);
        Some(SearchResult {
            relevance: analysis::relevance(query, &text),
            entities: analysis::extract_entities(&text),
            title: hit.title,
            url: hit.url,
            text_excerpt: text,
        })
    }
}
