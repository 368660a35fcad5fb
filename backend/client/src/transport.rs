//! One HTTP exchange with the recognition endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use snapstory_core::{EncodedImage, RecognitionResult};
use tracing::debug;

use crate::error::ClientError;

/// Status line and body of a finished exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, image: &EncodedImage) -> Result<TransportResponse, ClientError>;
}

/// Multipart POST to the recognition endpoint via reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn exchange(&self, image: &EncodedImage) -> Result<TransportResponse, ClientError> {
        let part = Part::bytes(image.data.to_vec())
            .file_name(upload_file_name(&image.mime_type))
            .mime_str(&image.mime_type)
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// Dropping the in-flight future on timeout cancels the request; the next
    /// attempt opens a fresh one.
    async fn send(&self, image: &EncodedImage) -> Result<TransportResponse, ClientError> {
        debug!(endpoint = %self.endpoint, bytes = image.len(), "Submitting image");
        match tokio::time::timeout(self.timeout, self.exchange(image)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

fn upload_file_name(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "capture.png",
        "image/webp" => "capture.webp",
        _ => "capture.jpg",
    }
}

/// Turn a raw exchange into a result, or a retryable error.
pub fn accept_response(response: &TransportResponse) -> Result<RecognitionResult, ClientError> {
    if !(200..300).contains(&response.status) {
        return Err(ClientError::Api { status: response.status });
    }
    let value: serde_json::Value = serde_json::from_str(&response.body)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
    let result: RecognitionResult = match serde_json::from_value(value) {
        Ok(result) => result,
        Err(_) => return Err(ClientError::MissingFields),
    };
    if !result.is_complete() {
        return Err(ClientError::MissingFields);
    }
    Ok(result)
}
