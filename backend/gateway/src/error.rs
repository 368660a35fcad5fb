use std::borrow::Cow;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use snapstory_core::SnapError;
use tracing::error;

/// An error answered with `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    PayloadTooLarge { max_bytes: usize },
    MethodNotAllowed,
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> Cow<'static, str> {
        match self {
            ApiError::BadRequest(message) => Cow::Borrowed(*message),
            ApiError::PayloadTooLarge { max_bytes } => Cow::Owned(format!(
                "Image file too large. Maximum size is {}.",
                megabytes(*max_bytes)
            )),
            ApiError::MethodNotAllowed => Cow::Borrowed("Method not allowed"),
            ApiError::Internal => Cow::Borrowed("Internal server error"),
        }
    }
}

/// `10MB` for whole mebibytes, otherwise one decimal place.
fn megabytes(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    }
}

impl From<SnapError> for ApiError {
    fn from(err: SnapError) -> Self {
        match err {
            SnapError::MissingImage => ApiError::BadRequest("No image file provided"),
            SnapError::EmptyImage => ApiError::BadRequest("Image file is empty"),
            SnapError::ImageTooLarge { max, .. } => ApiError::PayloadTooLarge { max_bytes: max },
            SnapError::NotAnImage(_) => ApiError::BadRequest("Invalid file type. Please upload an image."),
            SnapError::MalformedUpload(_) => ApiError::BadRequest("Invalid multipart form data"),
            other => {
                error!(error = %other, "Unexpected error while handling upload");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_upload_errors_to_client_messages() {
        let cases = [
            (SnapError::MissingImage, 400, "No image file provided"),
            (SnapError::EmptyImage, 400, "Image file is empty"),
            (
                SnapError::ImageTooLarge { size: 11 * 1024 * 1024, max: 10 * 1024 * 1024 },
                413,
                "Image file too large. Maximum size is 10MB.",
            ),
            (
                SnapError::NotAnImage("text/plain".into()),
                400,
                "Invalid file type. Please upload an image.",
            ),
            (SnapError::MalformedUpload("eof".into()), 400, "Invalid multipart form data"),
            (SnapError::Timeout(20_000), 500, "Internal server error"),
        ];
        for (err, status, message) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status().as_u16(), status);
            assert_eq!(api.message(), message);
        }
    }

    #[test]
    fn size_message_follows_configured_cap() {
        let five = ApiError::PayloadTooLarge { max_bytes: 5 * 1024 * 1024 };
        assert_eq!(five.message(), "Image file too large. Maximum size is 5MB.");
        let odd = ApiError::PayloadTooLarge { max_bytes: 2_500_000 };
        assert_eq!(odd.message(), "Image file too large. Maximum size is 2.4MB.");
    }
}
