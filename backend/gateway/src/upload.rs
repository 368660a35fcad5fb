//! `POST /`: multipart photo upload → recognition result.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use snapstory_core::{EncodedImage, RecognitionResult, SnapError};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::AppState;

/// Multipart field carrying the photo.
pub const IMAGE_FIELD: &str = "image";

pub async fn handle_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RecognitionResult>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("upload", request_id = %request_id);

    async move {
        let multipart = multipart.map_err(|rejection| {
            warn!(error = %rejection.body_text(), "Rejected non-multipart upload");
            ApiError::from(SnapError::MalformedUpload(rejection.body_text()))
        })?;
        let image = read_image(multipart, state.max_upload_bytes).await?;
        info!(bytes = image.len(), mime = %image.mime_type, "Image accepted");

        let result = state.recognizer.recognize(&image, &request_id).await;
        Ok(Json(result))
    }
    .instrument(span)
    .await
}

async fn read_image(mut multipart: Multipart, max_bytes: usize) -> Result<EncodedImage, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, max_bytes))? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let declared = field.content_type().map(str::to_owned);
        let data = field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;
        return check_image(data, declared.as_deref(), file_name.as_deref(), max_bytes)
            .map_err(ApiError::from);
    }
    Err(SnapError::MissingImage.into())
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge { max_bytes };
    }
    warn!(error = %err.body_text(), "Malformed multipart body");
    SnapError::MalformedUpload(err.body_text()).into()
}

/// Server-side acceptance checks: non-empty, within the size cap, an image type.
pub fn check_image(
    data: Bytes,
    declared: Option<&str>,
    file_name: Option<&str>,
    max_bytes: usize,
) -> Result<EncodedImage, SnapError> {
    if data.is_empty() {
        return Err(SnapError::EmptyImage);
    }
    if data.len() > max_bytes {
        return Err(SnapError::ImageTooLarge { size: data.len(), max: max_bytes });
    }
    let mime_type = media::resolve_upload_mime(declared, file_name, &data);
    if !media::is_image(&mime_type) {
        return Err(SnapError::NotAnImage(mime_type));
    }
    Ok(EncodedImage::new(data, mime_type))
}
