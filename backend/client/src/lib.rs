//! Client side of SnapStory: capture a frame, validate it, submit it with
//! bounded retries, and read the resulting story aloud.

pub mod camera;
pub mod error;
pub mod friendly;
pub mod recognition;
pub mod retry;
pub mod speech;
pub mod transport;

pub use camera::{CameraPermission, FrameSource, capture_and_submit, wait_until_ready};
pub use error::ClientError;
pub use friendly::friendly_message;
pub use recognition::{RecognitionClient, RecognitionState};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper, run_with_retry};
pub use speech::{Narrator, SpeechState, Speaker};
pub use transport::{HttpTransport, Transport, TransportResponse, accept_response};
