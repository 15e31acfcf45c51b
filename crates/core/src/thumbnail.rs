//! Avatar downscaling.
//!
//! Inline avatars above [`AVATAR_SIZE_THRESHOLD`] characters are decoded,
//! shrunk to fit [`THUMBNAIL_MAX_DIMENSION`] and re-encoded as JPEG so the
//! persisted character collection stays small.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::error::CoreError;

/// Encoded length above which an avatar is downscaled.
pub const AVATAR_SIZE_THRESHOLD: usize = 100_000;

/// Largest width or height of a thumbnail, in pixels.
pub const THUMBNAIL_MAX_DIMENSION: u32 = 100;

pub const THUMBNAIL_JPEG_QUALITY: u8 = 70;

const DATA_URL_IMAGE_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

pub fn needs_thumbnail(avatar: &str) -> bool {
    avatar.len() > AVATAR_SIZE_THRESHOLD
}

/// Scale `(width, height)` down to fit a `max` x `max` box, preserving
/// aspect ratio. Dimensions already within the box are returned unchanged.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let ratio = (max as f64 / width as f64).min(max as f64 / height as f64);
    let scaled = |v: u32| ((v as f64 * ratio) as u32).max(1);
    (scaled(width), scaled(height))
}

/// Decode an inline `data:image/*;base64,` avatar, downscale it and return
/// a `data:image/jpeg;base64,` URL.
pub fn thumbnail_data_url(avatar: &str) -> Result<String, CoreError> {
    let payload = avatar
        .strip_prefix(DATA_URL_IMAGE_PREFIX)
        .and_then(|rest| rest.split_once(BASE64_MARKER))
        .map(|(_, data)| data)
        .ok_or_else(|| {
            CoreError::Validation(
                "Avatar is too large and is not an inline base64 image".to_string(),
            )
        })?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| CoreError::Validation(format!("Avatar is not valid base64: {e}")))?;

    let img = image::load_from_memory(&bytes)
        .map_err(|e| CoreError::Validation(format!("Avatar image could not be decoded: {e}")))?;

    let (width, height) = img.dimensions();
    let (new_width, new_height) = fit_within(width, height, THUMBNAIL_MAX_DIMENSION);
    let resized = if (new_width, new_height) == (width, height) {
        img
    } else {
        img.resize_exact(new_width, new_height, FilterType::Triangle)
    };

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, THUMBNAIL_JPEG_QUALITY);
    DynamicImage::ImageRgb8(resized.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| CoreError::Internal(format!("Failed to encode thumbnail: {e}")))?;

    tracing::debug!(
        original_len = avatar.len(),
        width = new_width,
        height = new_height,
        "Avatar downscaled"
    );

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg)))
}

/// Downscale `avatar` off the async runtime when it exceeds the size
/// threshold; smaller avatars are returned as-is.
pub async fn downscale_avatar(avatar: String) -> Result<String, CoreError> {
    if !needs_thumbnail(&avatar) {
        return Ok(avatar);
    }
    tokio::task::spawn_blocking(move || thumbnail_data_url(&avatar))
        .await
        .map_err(|e| CoreError::Internal(format!("Thumbnail task failed: {e}")))?
}
