//! `snapstory status`: check a running server's health endpoint.

use anyhow::Result;
use serde_json::Value;

use crate::terminal_output::{note_success, note_warn};

pub async fn run(health_url: &str) -> Result<()> {
    match reqwest::get(health_url).await {
        Ok(resp) if resp.status().is_success() => {
            let body: Value = resp.json().await?;
            note_success(&format!(
                "{} {} is {}",
                body["service"].as_str().unwrap_or("snapstory"),
                body["version"].as_str().unwrap_or("?"),
                body["status"].as_str().unwrap_or("unknown"),
            ));
        }
        Ok(resp) => note_warn(&format!("Server answered {} at {health_url}", resp.status())),
        Err(_) => note_warn(&format!("SnapStory is not running at {health_url}")),
    }
    Ok(())
}
