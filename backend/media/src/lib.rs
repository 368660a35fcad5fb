pub mod capture;
pub mod mime_detect;
pub mod validate;

pub use capture::{CaptureError, CaptureOptions, ImageEncoding, RawFrame, apply_contrast, capture_frame};
pub use mime_detect::{detect_mime_type, is_image, resolve_upload_mime, sniff_image_type};
pub use validate::{ImageRejection, validate, validate_image};
