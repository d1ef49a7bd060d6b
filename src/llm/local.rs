//! HTTP client for a local model runtime.
//!
//! Uses the raw completion endpoint (`POST /api/generate` with `raw: true`) so the
//! prompt assembled by the engine reaches the model verbatim, without the runtime's
//! own chat template.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GenerationError, GenerationParams, TextGenerator};
use crate::config::LlmConfig;

pub struct LocalRuntime {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    raw: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    eval_count: Option<u64>,
}

impl LocalRuntime {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for LocalRuntime {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            raw: true,
            options: GenerateOptions {
                temperature: params.temperature,
                num_predict: params.max_tokens,
            },
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending generate request");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_completion(&body)
    }
}

/// Extract the trimmed completion from a non-streaming `/api/generate` body.
fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let completion: GenerateResponse = serde_json::from_str(body)?;
    let text = completion.response.trim();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    tracing::debug!(tokens = completion.eval_count.unwrap_or(0), "generation complete");
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_disables_streaming_and_templating() {
        let body = GenerateRequest {
            model: "phi4-mini",
            prompt: "Utente: ciao\nAssistant: ",
            stream: false,
            raw: true,
            options: GenerateOptions {
                temperature: 0.7,
                num_predict: 512,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["raw"], true);
        assert_eq!(json["options"]["num_predict"], 512);
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let config = LlmConfig {
            base_url: "http://localhost:11434/".into(),
            ..LlmConfig::default()
        };
        assert_eq!(LocalRuntime::new(&config).base_url, "http://localhost:11434");
    }

    #[test]
    fn completion_is_trimmed() {
        let body = r#"{"response": "  Ciao!\n", "done": true, "eval_count": 3}"#;
        assert_eq!(parse_completion(body).unwrap(), "Ciao!");
    }

    #[test]
    fn blank_or_missing_completion_is_empty_response() {
        assert!(matches!(
            parse_completion(r#"{"done": true}"#),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            parse_completion(r#"{"response": "   "}"#),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = parse_completion("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
        assert!(err.to_string().starts_with("runtime response is not valid JSON"));
    }
}
