//! Still-frame capture: raw video frame → contrast-adjusted, encoded image.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use snapstory_core::EncodedImage;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// No usable drawing surface: zero dimensions or a pixel buffer that does
    /// not match them.
    #[error("no rendering context: {0}")]
    NoContext(String),

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("image encoding produced no data")]
    EmptyEncoding,
}

/// One decoded video frame as RGBA8 pixels.
///
/// Some decoders report `0×0` until the first frame is painted even though
/// pixels are available; the displayed size is used in that case.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub display_width: u32,
    pub display_height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    Jpeg,
    Png,
}

impl ImageEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub encoding: ImageEncoding,
    /// 0.0–1.0, only used for JPEG.
    pub quality: f32,
    pub contrast_boost: bool,
    pub contrast_factor: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            encoding: ImageEncoding::Jpeg,
            quality: 0.8,
            contrast_boost: true,
            contrast_factor: 1.2,
        }
    }
}

impl RawFrame {
    /// Size of the surface to draw into: decoded size, else displayed size.
    pub fn target_dimensions(&self) -> Option<(u32, u32)> {
        if self.width > 0 && self.height > 0 {
            Some((self.width, self.height))
        } else if self.display_width > 0 && self.display_height > 0 {
            Some((self.display_width, self.display_height))
        } else {
            None
        }
    }
}

/// Multiply R, G and B by `factor`, clamping at 255. Alpha is left untouched.
pub fn apply_contrast(rgba: &mut [u8], factor: f32) {
    for pixel in rgba.chunks_exact_mut(4) {
        for channel in &mut pixel[..3] {
            *channel = (*channel as f32 * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Draw a frame onto an offscreen surface and encode it.
pub fn capture_frame(frame: &RawFrame, options: &CaptureOptions) -> Result<EncodedImage, CaptureError> {
    let (width, height) = frame.target_dimensions().ok_or_else(|| {
        CaptureError::NoContext("video reports zero decoded and displayed size".into())
    })?;

    let mut pixels = frame.rgba.clone();
    if options.contrast_boost {
        apply_contrast(&mut pixels, options.contrast_factor);
    }

    let surface = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
        CaptureError::NoContext(format!(
            "pixel buffer of {} bytes does not fit {width}x{height}",
            frame.rgba.len()
        ))
    })?;

    let mut encoded = Vec::new();
    match options.encoding {
        ImageEncoding::Jpeg => {
            // JPEG carries no alpha channel.
            let rgb = DynamicImage::ImageRgba8(surface).to_rgb8();
            let quality = (options.quality.clamp(0.01, 1.0) * 100.0).round() as u8;
            JpegEncoder::new_with_quality(&mut encoded, quality).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        ImageEncoding::Png => {
            PngEncoder::new(&mut encoded).write_image(
                surface.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
    }

    if encoded.is_empty() {
        return Err(CaptureError::EmptyEncoding);
    }

    debug!(width, height, bytes = encoded.len(), "Captured frame");
    Ok(EncodedImage::new(encoded, options.encoding.mime_type()))
}
