use thiserror::Error;

/// Top-level error type for the SnapStory server pipeline.
#[derive(Debug, Error)]
pub enum SnapError {
    #[error("no image file provided")]
    MissingImage,

    #[error("image file is empty")]
    EmptyImage,

    #[error("image file too large: {size} bytes (max {max})")]
    ImageTooLarge { size: usize, max: usize },

    #[error("unsupported content type: {0}")]
    NotAnImage(String),

    #[error("malformed upload: {0}")]
    MalformedUpload(String),

    #[error("AI provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("AI call timed out after {0} ms")]
    Timeout(u64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
