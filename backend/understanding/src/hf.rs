//! Image-classification endpoint classifier (Hugging Face inference style).
//!
//! The endpoint takes raw image bytes and answers `[{label, score}, ...]`.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use snapstory_core::{Classification, Classifier};
use tracing::debug;

use crate::labels::normalize_label;

pub struct HfImageClassifier {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HfImageClassifier {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ScoredLabel {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HfResponse {
    Scores(Vec<ScoredLabel>),
    Error { error: String },
}

/// Pick the highest-scoring usable label.
fn best_label(scores: Vec<ScoredLabel>, source: &str) -> Option<Classification> {
    scores
        .into_iter()
        .filter_map(|s| normalize_label(&s.label).map(|label| (label, s.score)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, confidence)| Classification {
            label,
            confidence,
            source: source.to_string(),
        })
}

#[async_trait]
impl Classifier for HfImageClassifier {
    fn name(&self) -> &str {
        &self.model
    }

    async fn classify(&self, image: &[u8], mime_type: &str) -> Result<Option<Classification>> {
        debug!(model = %self.model, bytes = image.len(), "Classifying image");

        let mut request = self
            .client
            .post(format!("{}/{}", self.base_url, self.model))
            .header("Content-Type", mime_type)
            .body(image.to_vec());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.context("Classifier HTTP request failed")?;
        let status = response.status();
        let body = response.text().await.context("Failed to read classifier response")?;
        if !status.is_success() {
            bail!("Classifier returned {}: {}", status, body);
        }

        match serde_json::from_str(&body).context("Failed to parse classifier response")? {
            HfResponse::Scores(scores) => Ok(best_label(scores, &self.model)),
            HfResponse::Error { error } => bail!("Classifier error: {}", error),
        }
    }
}
