use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use snapstory_core::{LlmProvider, LlmRequest, LlmResponse};

/// Ollama local text provider, using the one-shot `/api/generate` endpoint.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "http://localhost:11434".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

fn is_blank(s: &&str) -> bool {
    s.is_empty()
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    eval_count: Option<u64>,
    prompt_eval_count: Option<u64>,
}

/// Ollama model tags have no provider prefix ("openai/gpt-4o" → "gpt-4o").
fn local_model_name(model: &str) -> &str {
    model.rsplit('/').next().unwrap_or(model)
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();
        let model = local_model_name(&request.model);

        let body = GenerateRequest {
            model,
            prompt: &request.user_prompt,
            system: &request.system_prompt,
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        debug!(model = %model, "Sending request to Ollama");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .context("Ollama HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama returned {}: {}", status, error_body);
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        Ok(LlmResponse {
            content: generated.response,
            provider: "ollama".to_string(),
            model: model.to_string(),
            tokens_used: generated.eval_count.unwrap_or(0) + generated.prompt_eval_count.unwrap_or(0),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_provider_prefix() {
        assert_eq!(local_model_name("meta-llama/llama3.2"), "llama3.2");
        assert_eq!(local_model_name("llama3.2"), "llama3.2");
    }

    #[test]
    fn empty_system_prompt_is_not_sent() {
        let body = GenerateRequest {
            model: "llama3.2",
            prompt: "hi",
            system: "",
            stream: false,
            options: GenerateOptions { temperature: 0.7, num_predict: 50 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["options"]["num_predict"], 50);
    }
}
