//! Text-generation capability.
//!
//! The engine depends only on [`TextGenerator`]. The default implementation,
//! [`local::LocalRuntime`], talks to a locally hosted llama.cpp / Ollama-compatible
//! server that serves the GGUF model.

pub mod local;

use async_trait::async_trait;

use crate::config::LlmConfig;

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
        }
    }
}

impl From<&LlmConfig> for GenerationParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("runtime request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("runtime returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("runtime response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("runtime returned an empty completion")]
    EmptyResponse,
}

/// Anything that can turn a prompt into text.
///
/// Calls block the caller for their full duration; no timeout is imposed here.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError>;
}

/// Create the configured generator.
pub fn create_generator(config: &LlmConfig) -> Box<dyn TextGenerator> {
    Box::new(local::LocalRuntime::new(config))
}
