use std::sync::Arc;

use crate::foundation::core::Rect;
use crate::foundation::error::{ReelError, ReelResult};

/// Decoded slide bitmap in premultiplied RGBA8 form.
///
/// Cloning is cheap: pixel data is shared behind an [`Arc`] and never mutated, so every frame that
/// shows the slide (and the caller) reads the same buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl SlideImage {
    /// Wrap already premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ReelResult<Self> {
        let img = Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        };
        img.validate()?;
        Ok(img)
    }

    /// Wrap straight-alpha RGBA8 pixels, premultiplying them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> ReelResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul_rgba8(width, height, rgba8)
    }

    /// A single-color opaque image, handy for tests and placeholders.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> ReelResult<Self> {
        let px = [rgb[0], rgb[1], rgb[2], 255];
        let n = (width as usize).saturating_mul(height as usize);
        Self::from_premul_rgba8(width, height, px.repeat(n))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes, row-major and tightly packed.
    pub fn pixels(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Rectangle covering the whole image.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Check the buffer is non-empty and matches `width * height * 4`.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::decode(format!(
                "image dimensions must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ReelError::decode("image buffer size overflow"))?;
        if self.rgba8_premul.len() != expected {
            return Err(ReelError::decode(format!(
                "image buffer is {} bytes, expected {} for {}x{} rgba8",
                self.rgba8_premul.len(),
                expected,
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
