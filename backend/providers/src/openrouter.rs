use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use snapstory_core::{LlmProvider, LlmRequest, LlmResponse};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const APP_TITLE: &str = "SnapStory";

/// OpenRouter (or any OpenAI-compatible `/chat/completions`) text provider.
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    base_url: String,
    referer: Option<String>,
}

impl OpenRouterProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Site URL sent as `HTTP-Referer` for OpenRouter attribution.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

fn build_messages(request: &LlmRequest) -> Vec<ChatMessage<'_>> {
    let system = (!request.system_prompt.is_empty()).then(|| ChatMessage {
        role: "system",
        content: &request.system_prompt,
    });
    system
        .into_iter()
        .chain(std::iter::once(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        }))
        .collect()
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &request.model,
            messages: build_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(model = %request.model, base_url = %self.base_url, "Sending chat completion");

        let mut http = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Title", APP_TITLE)
            .json(&body);
        if let Some(referer) = &self.referer {
            http = http.header("HTTP-Referer", referer);
        }

        let response = http.send().await.context("OpenRouter HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenRouter returned {}: {}", status, error_body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenRouter response")?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .context("OpenRouter response contained no choices")?;

        if choice.finish_reason.as_deref() == Some("length") {
            debug!(model = %request.model, "Completion hit max_tokens; text may be truncated");
        }

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            provider: "openrouter".to_string(),
            model: request.model.clone(),
            tokens_used: chat_response.usage.and_then(|u| u.total_tokens).unwrap_or(0),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
