//! Vision-LLM classifier: ask a multimodal chat model to name the object.
//!
//! Used as the secondary classifier when the dedicated image-classification
//! endpoint errors or is unsure.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use snapstory_core::{Classification, Classifier};
use tracing::info;

use crate::labels::normalize_label;

pub const VISION_PROMPT: &str = "What is the main object in this photo? \
Answer with one or two simple English words a young child would know, then '|' and your \
confidence from 0 to 1. Example: apple|0.92. If there is no clear object, answer: none|0";

/// Supported vision backends.
pub enum VisionBackend {
    /// Any OpenAI-compatible `/chat/completions` endpoint (OpenAI, OpenRouter, ...).
    OpenAi { api_key: String, model: String, base_url: String },
    Gemini { api_key: String, model: String },
}

impl VisionBackend {
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::OpenAi {
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn gemini(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::Gemini { api_key: api_key.into(), model: model.into() }
    }

    pub fn with_base_url(self, url: impl Into<String>) -> Self {
        match self {
            Self::OpenAi { api_key, model, .. } => Self::OpenAi {
                api_key,
                model,
                base_url: url.into().trim_end_matches('/').to_string(),
            },
            other => other,
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::OpenAi { model, .. } | Self::Gemini { model, .. } => model,
        }
    }
}

pub struct VisionClassifier {
    client: Client,
    backend: VisionBackend,
}

impl VisionClassifier {
    pub fn new(backend: VisionBackend) -> Self {
        Self { client: Client::new(), backend }
    }
}

/// Parse a `label|confidence` answer.
///
/// A bare label counts as fully confident; an unparsable confidence likewise.
pub fn parse_vision_answer(answer: &str) -> Option<(String, f32)> {
    let line = answer.lines().map(str::trim).find(|l| !l.is_empty())?;
    let (label, confidence) = match line.split_once('|') {
        Some((label, confidence)) => (label, parse_confidence(confidence)),
        None => (line, 1.0),
    };
    normalize_label(label).map(|label| (label, confidence))
}

/// Values above 1 up to 100 are read as percentages. Non-finite values score 0.
fn parse_confidence(raw: &str) -> f32 {
    let Ok(value) = raw
        .trim()
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse::<f32>()
    else {
        return 1.0;
    };
    if !value.is_finite() {
        return 0.0;
    }
    let value = if value > 1.0 && value <= 100.0 { value / 100.0 } else { value };
    value.clamp(0.0, 1.0)
}

#[async_trait]
impl Classifier for VisionClassifier {
    fn name(&self) -> &str {
        self.backend.model()
    }

    async fn classify(&self, image: &[u8], mime_type: &str) -> Result<Option<Classification>> {
        let b64 = STANDARD.encode(image);
        let answer = match &self.backend {
            VisionBackend::OpenAi { api_key, model, base_url } => {
                ask_openai(&self.client, base_url, api_key, model, &b64, mime_type).await?
            }
            VisionBackend::Gemini { api_key, model } => {
                ask_gemini(&self.client, api_key, model, &b64, mime_type).await?
            }
        };

        Ok(parse_vision_answer(&answer).map(|(label, confidence)| Classification {
            label,
            confidence,
            source: self.backend.model().to_string(),
        }))
    }
}

async fn ask_openai(
    client: &Client, base_url: &str, api_key: &str, model: &str, b64: &str, mime_type: &str,
) -> Result<String> {
    info!("[Vision] Classifying image via OpenAI-compatible {}", model);
    let body = serde_json::json!({
        "model": model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": VISION_PROMPT },
                { "type": "image_url",
                  "image_url": { "url": format!("data:{};base64,{}", mime_type, b64) } }
            ]
        }],
        "max_tokens": 20,
        "temperature": 0
    });
    let resp = client
        .post(format!("{base_url}/chat/completions"))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .context("Vision HTTP request failed")?;
    let status = resp.status();
    if !status.is_success() {
        bail!("Vision model error {}: {}", status, resp.text().await.unwrap_or_default());
    }
    let json: serde_json::Value = resp.json().await.context("Failed to parse vision response")?;
    Ok(json["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string())
}

async fn ask_gemini(
    client: &Client, api_key: &str, model: &str, b64: &str, mime_type: &str,
) -> Result<String> {
    info!("[Vision] Classifying image via Gemini {}", model);
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
    );
    let body = serde_json::json!({
        "contents": [{ "parts": [
            { "text": VISION_PROMPT },
            { "inlineData": { "mimeType": mime_type, "data": b64 } }
        ]}],
        "generationConfig": { "maxOutputTokens": 20, "temperature": 0 }
    });
    let resp = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(&body)
        .send()
        .await
        .context("Gemini HTTP request failed")?;
    let status = resp.status();
    if !status.is_success() {
        bail!("Gemini vision error {}: {}", status, resp.text().await.unwrap_or_default());
    }
    let json: serde_json::Value = resp.json().await.context("Failed to parse Gemini response")?;
    Ok(json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or("")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_and_confidence() {
        assert_eq!(parse_vision_answer("Apple|0.92"), Some(("apple".into(), 0.92)));
    }

    #[test]
    fn bare_label_is_confident() {
        assert_eq!(parse_vision_answer("\n  Teddy bear.\n"), Some(("teddy bear".into(), 1.0)));
    }

    #[test]
    fn none_answer_is_nothing() {
        assert_eq!(parse_vision_answer("none|0"), None);
        assert_eq!(parse_vision_answer(""), None);
    }

    #[test]
    fn tolerates_trailing_text_after_confidence() {
        assert_eq!(parse_vision_answer("cup | 0.8."), Some(("cup".into(), 0.8)));
        assert_eq!(parse_vision_answer("cup|high"), Some(("cup".into(), 1.0)));
    }

    #[test]
    fn percentages_are_scaled_down() {
        assert_eq!(parse_vision_answer("apple|5%"), Some(("apple".into(), 0.05)));
        assert_eq!(parse_vision_answer("apple | 92"), Some(("apple".into(), 0.92)));
        assert_eq!(parse_vision_answer("apple|100%"), Some(("apple".into(), 1.0)));
        assert_eq!(parse_vision_answer("apple|250"), Some(("apple".into(), 1.0)));
    }

    #[test]
    fn non_finite_confidence_scores_zero() {
        assert_eq!(parse_confidence("1e999"), 0.0);
        assert_eq!(parse_confidence("0.7"), 0.7);
    }
}
