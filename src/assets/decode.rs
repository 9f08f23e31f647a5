use std::path::Path;

use anyhow::Context;

use crate::{assets::image::SlideImage, foundation::error::ReelResult};

/// Decode encoded image bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> ReelResult<SlideImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SlideImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
#[tracing::instrument]
pub fn load_image(path: &Path) -> ReelResult<SlideImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let img = decode_image(&bytes).with_context(|| format!("decode image '{}'", path.display()));
    Ok(img?)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
