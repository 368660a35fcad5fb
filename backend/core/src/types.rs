use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// An encoded still image on its way to recognition.
///
/// Lives for one capture/upload and is dropped after the HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: Bytes,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the declared type is `image/*`, ignoring case and padding.
    pub fn is_image_type(&self) -> bool {
        self.mime_type.trim().to_ascii_lowercase().starts_with("image/")
    }
}

/// The JSON body returned for a recognised (or unrecognised) photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub word: String,
    pub story: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_story: Option<String>,
    /// Set when an upstream AI call failed and fallback content was used.
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl RecognitionResult {
    /// `word` and `story` both carry text.
    pub fn is_complete(&self) -> bool {
        !self.word.trim().is_empty() && !self.story.trim().is_empty()
    }
}

/// A classifier's best guess for an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
    /// Name of the classifier that produced this label.
    pub source: String,
}
