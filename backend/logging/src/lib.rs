//! Telemetry and structured logging for SnapStory.
//!
//! Handles log redaction, console/JSON output, daily file rotation, and
//! recognition pipeline events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{PipelineEvent, PipelineEventEntry, PipelineStage, log_pipeline_event};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
