//! HTML-scraping search backends.
//!
//! Each backend does one HTTP round trip and pulls result anchors out of the page.
//! No API keys are involved.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use super::SearchHit;

const DUCKDUCKGO_URL: &str = "https://html.duckduckgo.com/html/";
const BRAVE_URL: &str = "https://search.brave.com/search";

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static MAIN_ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main a").unwrap());

#[async_trait]
pub trait SearchBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Run `query`, returning at most `limit` hits.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

/// DuckDuckGo's JavaScript-free HTML endpoint (form POST, Italian locale).
pub struct DuckDuckGo {
    client: Client,
}

impl DuckDuckGo {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", query)
            .append_pair("kl", "it-it")
            .finish();

        let html = self
            .client
            .post(DUCKDUCKGO_URL)
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .context("duckduckgo request failed")?
            .error_for_status()?
            .text()
            .await
            .context("duckduckgo body unreadable")?;

        Ok(parse_duckduckgo(&html, limit))
    }
}

/// Absolute `https://` anchors that do not point back at DuckDuckGo itself.
pub fn parse_duckduckgo(html: &str, limit: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            if !href.starts_with("https://") || href.contains("duckduckgo") {
                return None;
            }
            Some(SearchHit {
                title: anchor_text(&a),
                url: href.to_string(),
            })
        })
        .take(limit)
        .collect()
}

/// Brave Search's server-rendered results page.
pub struct Brave {
    client: Client,
}

impl Brave {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchBackend for Brave {
    fn name(&self) -> &str {
        "brave"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let url = url::Url::parse_with_params(BRAVE_URL, &[("q", query)])?;

        let html = self
            .client
            .get(url)
            .send()
            .await
            .context("brave request failed")?
            .error_for_status()?
            .text()
            .await
            .context("brave body unreadable")?;

        Ok(parse_brave(&html, limit))
    }
}

/// Anchors inside `<main>` whose href is an absolute http(s) URL.
pub fn parse_brave(html: &str, limit: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    document
        .select(&MAIN_ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            if !href.starts_with("http") {
                return None;
            }
            Some(SearchHit {
                title: anchor_text(&a),
                url: href.to_string(),
            })
        })
        .take(limit)
        .collect()
}

fn anchor_text(a: &scraper::ElementRef<'_>) -> String {
    a.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
