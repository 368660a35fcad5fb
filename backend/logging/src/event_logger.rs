//! Recognition pipeline events.
//!
//! One structured entry per pipeline stage, emitted under the
//! `pipeline_events` target so they can be filtered or shipped separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

/// AI-dependent steps of a recognition request.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Classify,
    Story,
    Translation,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    Classified {
        label: String,
        confidence: f32,
        source: String,
    },
    Unrecognized,
    FallbackUsed {
        stage: PipelineStage,
        reason: String,
    },
    Responded {
        word: String,
        degraded: bool,
        elapsed_ms: u64,
    },
}

#[derive(Debug, Serialize)]
pub struct PipelineEventEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: PipelineEvent,
}

/// Log a pipeline event, redacting provider error text first.
pub fn log_pipeline_event(request_id: &str, mut event: PipelineEvent) {
    if let PipelineEvent::FallbackUsed { reason, .. } = &mut event {
        *reason = redact_sensitive_data(reason);
    }

    let entry = PipelineEventEntry {
        request_id: request_id.into(),
        timestamp: Utc::now(),
        event,
    };

    match serde_json::to_string(&entry) {
        Ok(json) => info!(target: "pipeline_events", event = %json, "Pipeline event"),
        Err(_) => info!(target: "pipeline_events", event = ?entry, "Pipeline event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_event_serializes_with_tag() {
        let entry = PipelineEventEntry {
            request_id: "r1".into(),
            timestamp: Utc::now(),
            event: PipelineEvent::FallbackUsed {
                stage: PipelineStage::Story,
                reason: "timeout".into(),
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "fallback_used");
        assert_eq!(json["event"]["stage"], "story");
    }
}
