//! Camera readiness and the capture → submit chain.

use std::time::Duration;

use async_trait::async_trait;
use media::{CaptureOptions, RawFrame, capture_frame};
use snapstory_core::RecognitionResult;
use tracing::{debug, info};

use crate::error::ClientError;
use crate::recognition::RecognitionClient;

pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const READY_MAX_POLLS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPermission {
    Prompt,
    Granted,
    Denied,
}

/// A live video source.
#[async_trait]
pub trait FrameSource: Send + Sync {
    fn permission(&self) -> CameraPermission;

    /// Decoded video size; `(0, 0)` until the first frame arrives.
    fn dimensions(&self) -> (u32, u32);

    async fn grab(&self) -> Result<RawFrame, ClientError>;
}

/// Poll until the source reports non-zero dimensions.
pub async fn wait_until_ready(
    source: &dyn FrameSource,
    interval: Duration,
    max_polls: u32,
) -> Result<(u32, u32), ClientError> {
    if source.permission() == CameraPermission::Denied {
        return Err(ClientError::CameraPermissionDenied);
    }
    for poll in 0..max_polls {
        let (width, height) = source.dimensions();
        if width > 0 && height > 0 {
            debug!(width, height, polls = poll + 1, "Camera ready");
            return Ok((width, height));
        }
        tokio::time::sleep(interval).await;
    }
    Err(ClientError::CameraNotReady { polls: max_polls })
}

/// Wait for the camera, grab and encode a frame, then submit it.
pub async fn capture_and_submit(
    source: &dyn FrameSource,
    client: &RecognitionClient,
    options: &CaptureOptions,
) -> Result<RecognitionResult, ClientError> {
    wait_until_ready(source, READY_POLL_INTERVAL, READY_MAX_POLLS).await?;
    let frame = source.grab().await?;
    let image = capture_frame(&frame, options)?;
    info!(bytes = image.len(), mime = %image.mime_type, "Frame captured");
    client.submit_for_recognition(&image).await
}
