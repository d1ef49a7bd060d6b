//! Pure text heuristics used by the research pipeline: host deduplication, visible-text
//! extraction, keyword-overlap relevance, and entity spotting.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Node};

use super::SearchHit;

/// Maximum number of entities kept per page.
pub const MAX_ENTITIES: usize = 5;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}\b").unwrap());
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

/// Host of `url`, or an empty string when it does not parse.
pub fn url_host(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Keep the first hit for every host, preserving order.
pub fn dedup_by_host(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(url_host(&hit.url)))
        .collect()
}

/// Fraction of query words that occur (case-insensitively, as substrings) in `text`,
/// clamped to `[0, 1]`. An empty query scores 0.
pub fn relevance(query: &str, text: &str) -> f64 {
    let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return 0.0;
    }
    let haystack = text.to_lowercase();
    let found = words.iter().filter(|w| haystack.contains(w.as_str())).count();
    (found as f64 / words.len() as f64).clamp(0.0, 1.0)
}

/// Date-like (`12/05/2024`, `1-2-24`) and email-like substrings, deduplicated in order
/// of first appearance, at most [`MAX_ENTITIES`].
pub fn extract_entities(text: &str) -> Vec<String> {
    let dates = DATE_RE.find_iter(text).map(|m| m.as_str());
    let emails = EMAIL_RE.find_iter(text).map(|m| m.as_str());

    let mut seen = HashSet::new();
    dates
        .chain(emails)
        .filter(|e| seen.insert(*e))
        .take(MAX_ENTITIES)
        .map(str::to_string)
        .collect()
}

/// Text content of an HTML page outside `<script>`, `<style>` and `<noscript>`, with
/// whitespace collapsed, truncated to `max_chars` characters.
pub fn visible_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript"));
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ").chars().take(max_chars).collect()
}
