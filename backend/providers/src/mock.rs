use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use snapstory_core::{LlmProvider, LlmRequest, LlmResponse};

/// A mock text provider that returns canned responses.
///
/// Scripted replies are consumed in order; once they run out the fixed
/// response (or "Mock response") is returned. A configured delay lets callers
/// exercise their timeouts.
pub struct MockProvider {
    name: String,
    fixed_response: Option<String>,
    script: Mutex<VecDeque<Result<String, String>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed_response: None,
            script: Mutex::new(VecDeque::new()),
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Queue one successful reply.
    pub fn then_reply(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()));
        self
    }

    /// Queue one failure.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn push(&self, item: Result<String, String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(item);
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(req.user_prompt.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let content = match scripted {
            Some(Ok(text)) => text,
            Some(Err(message)) => return Err(anyhow!(message)),
            None => self
                .fixed_response
                .clone()
                .unwrap_or_else(|| "Mock response".to_string()),
        };

        Ok(LlmResponse {
            content,
            provider: self.name.clone(),
            model: "mock".to_string(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
