pub mod error;
pub mod limits;
pub mod traits;
pub mod types;

pub use error::SnapError;
pub use limits::{
    CLIENT_ATTEMPT_TIMEOUT_MS, CONFIDENCE_FLOOR, DEFAULT_REQUEST_BUDGET_MS, MAX_UPLOAD_BYTES,
    MIN_CLIENT_IMAGE_BYTES,
};
pub use traits::{Classifier, LlmProvider, LlmRequest, LlmResponse};
pub use types::{Classification, EncodedImage, RecognitionResult};
