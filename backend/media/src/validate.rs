//! Cheap sanity checks run on a captured image before it is submitted.

use snapstory_core::{EncodedImage, MAX_UPLOAD_BYTES, MIN_CLIENT_IMAGE_BYTES};
use thiserror::Error;

/// Why an image was refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageRejection {
    #[error("Image too small ({size} bytes, minimum {min})")]
    TooSmall { size: usize, min: usize },

    #[error("Image too large ({size} bytes, maximum {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Not an image: {0}")]
    NotAnImage(String),
}

/// Check size bounds and declared type. Not a content-quality check.
pub fn validate_image(image: &EncodedImage) -> Result<(), ImageRejection> {
    let size = image.len();
    if size < MIN_CLIENT_IMAGE_BYTES {
        return Err(ImageRejection::TooSmall {
            size,
            min: MIN_CLIENT_IMAGE_BYTES,
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ImageRejection::TooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }
    if !image.is_image_type() {
        return Err(ImageRejection::NotAnImage(image.mime_type.clone()));
    }
    Ok(())
}

pub fn validate(image: &EncodedImage) -> bool {
    validate_image(image).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_jpeg() {
        let image = EncodedImage::new(vec![0u8; 50 * 1024], "image/jpeg");
        assert!(validate(&image));
    }

    #[test]
    fn rejects_below_one_kilobyte() {
        let image = EncodedImage::new(vec![0u8; 1023], "image/jpeg");
        assert_eq!(
            validate_image(&image),
            Err(ImageRejection::TooSmall { size: 1023, min: 1024 })
        );
        assert!(validate(&EncodedImage::new(vec![0u8; 1024], "image/jpeg")));
    }

    #[test]
    fn rejects_non_image_type() {
        let image = EncodedImage::new(vec![0u8; 4096], "application/pdf");
        assert!(matches!(validate_image(&image), Err(ImageRejection::NotAnImage(_))));
    }

    #[test]
    fn mime_case_matches_upload_detection() {
        for declared in ["IMAGE/JPEG", "Image/Png "] {
            let image = EncodedImage::new(vec![0u8; 4096], declared);
            assert_eq!(validate(&image), crate::is_image(declared), "type {declared}");
            assert!(validate(&image));
        }
    }

    #[test]
    fn rejects_oversized() {
        let image = EncodedImage::new(vec![0u8; MAX_UPLOAD_BYTES + 1], "image/png");
        assert!(matches!(validate_image(&image), Err(ImageRejection::TooLarge { .. })));
    }
}
