#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use arcadia::chat::ConversationEngine;
use arcadia::commands::CommandInterpreter;
use arcadia::llm::{GenerationError, GenerationParams, TextGenerator};
use arcadia::research::backends::SearchBackend;
use arcadia::research::fetch::PageFetcher;
use arcadia::research::{ResearchLimits, Researcher, SearchHit};
use async_trait::async_trait;

/// How the fake generator answers.
#[derive(Clone)]
pub enum Behavior {
    /// Reply with a fixed string.
    Fixed(String),
    /// Reply with "risposta N" for the N-th call (1-based).
    Numbered,
    /// Fail every call.
    Fail,
}

/// Scripted generator that records every prompt it receives.
pub struct FakeGenerator {
    behavior: Behavior,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };
        match &self.behavior {
            Behavior::Fixed(reply) => Ok(reply.clone()),
            Behavior::Numbered => Ok(format!("risposta {call}")),
            Behavior::Fail => Err(GenerationError::Status {
                status: 503,
                body: "runtime offline".into(),
            }),
        }
    }
}

/// Backend returning canned hits, or failing.
pub struct FakeBackend {
    pub name: &'static str,
    pub hits: Option<Vec<SearchHit>>,
    /// Return every hit even when more than `limit` were asked for.
    pub ignore_limit: bool,
    /// Last `limit` the researcher passed in.
    pub requested: Mutex<Option<usize>>,
}

fn hits(urls: &[(&str, &str)]) -> Vec<SearchHit> {
    urls.iter()
        .map(|(title, url)| SearchHit {
            title: title.to_string(),
            url: url.to_string(),
        })
        .collect()
}

impl FakeBackend {
    fn build(name: &'static str, hits: Option<Vec<SearchHit>>, ignore_limit: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            hits,
            ignore_limit,
            requested: Mutex::new(None),
        })
    }

    pub fn ok(name: &'static str, urls: &[(&str, &str)]) -> Arc<dyn SearchBackend> {
        Self::build(name, Some(hits(urls)), false)
    }

    pub fn failing(name: &'static str) -> Arc<dyn SearchBackend> {
        Self::build(name, None, false)
    }

    /// A backend that answers with all of `urls` whatever limit it is given.
    pub fn greedy(name: &'static str, urls: &[(&str, &str)]) -> Arc<Self> {
        Self::build(name, Some(hits(urls)), true)
    }

    pub fn requested(&self) -> Option<usize> {
        *self.requested.lock().unwrap()
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    fn name(&self) -> &str {
        self.name
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        *self.requested.lock().unwrap() = Some(limit);
        match &self.hits {
            Some(hits) if self.ignore_limit => Ok(hits.clone()),
            Some(hits) => Ok(hits.iter().take(limit).cloned().collect()),
            None => Err(anyhow!("{} unreachable", self.name)),
        }
    }
}

/// Fetcher serving pages from a map; unknown URLs fail.
pub struct FakeFetcher {
    pages: HashMap<String, String>,
}

impl FakeFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Arc<dyn PageFetcher> {
        Arc::new(Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
        })
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("timeout fetching {url}"))
    }
}

pub fn limits() -> ResearchLimits {
    ResearchLimits {
        hits_per_backend: 3,
        max_pages: 3,
        excerpt_chars: 2000,
    }
}

/// A researcher whose backends never answer.
pub fn offline_researcher() -> Arc<Researcher> {
    Arc::new(Researcher::new(
        vec![FakeBackend::failing("ddg"), FakeBackend::failing("brave")],
        FakeFetcher::new(&[]),
        limits(),
    ))
}

/// Engine over `generator` with an offline researcher and `temp_dir` for archives.
pub fn engine(
    generator: Arc<FakeGenerator>,
    researcher: Arc<Researcher>,
    temp_dir: &Path,
    max_context: usize,
) -> ConversationEngine {
    let generator: Arc<dyn TextGenerator> = generator;
    let params = GenerationParams::default();
    let commands = CommandInterpreter::new(
        Arc::clone(&generator),
        researcher,
        params,
        temp_dir.to_path_buf(),
    );
    ConversationEngine::new(generator, commands, max_context, params)
}
