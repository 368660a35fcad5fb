use media::{CaptureError, ImageRejection};
use thiserror::Error;

/// Everything that can go wrong between the camera and a recognition result.
///
/// The `Display` strings are what [`crate::friendly_message`] matches on.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    InvalidImage(#[from] ImageRejection),

    #[error("Failed to fetch: {0}")]
    Network(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("API error: {status}")]
    Api { status: u16 },

    #[error("Invalid response from server: {0}")]
    MalformedResponse(String),

    #[error("Invalid response from server: missing word or story")]
    MissingFields,

    #[error("NotAllowedError: camera permission denied")]
    CameraPermissionDenied,

    #[error("NotFoundError: no camera available")]
    CameraNotFound,

    #[error("NotReadableError: {0}")]
    CameraUnreadable(String),

    #[error("Camera not ready: no video dimensions after {polls} checks")]
    CameraNotReady { polls: u32 },

    #[error("Failed to capture image: {0}")]
    Capture(#[from] CaptureError),
}

impl ClientError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_)
                | ClientError::Timeout(_)
                | ClientError::Api { .. }
                | ClientError::MalformedResponse(_)
                | ClientError::MissingFields
        )
    }
}
