//! `snapstory recognize <file>`: upload an image through the retrying client.

use std::path::Path;

use anyhow::{Context, Result};
use snapstory_client::{RecognitionClient, RetryPolicy, friendly_message};
use snapstory_core::EncodedImage;

use crate::terminal_output::{note_error, note_info, render_story};

pub struct RecognizeOptions {
    pub endpoint: String,
    pub max_retries: u32,
    pub timeout_ms: u64,
    pub json: bool,
}

pub async fn run(path: &Path, options: RecognizeOptions) -> Result<()> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let image = EncodedImage::new(data, media::detect_mime_type(path));

    let policy = RetryPolicy {
        max_retries: options.max_retries,
        timeout_ms: options.timeout_ms,
        ..Default::default()
    };
    let client = RecognitionClient::http(&options.endpoint, policy);
    note_info(&format!(
        "Uploading {} ({} bytes, {}) to {}",
        path.display(),
        image.len(),
        image.mime_type,
        options.endpoint
    ));

    match client.submit_for_recognition(&image).await {
        Ok(result) if options.json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Ok(result) => {
            print!("{}", render_story(&result));
            Ok(())
        }
        Err(e) => {
            note_error(&friendly_message(&e.to_string()));
            Err(e).context("Recognition failed")
        }
    }
}
