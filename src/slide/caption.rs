//! Per-slide caption text and its styling.

use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};

/// Font, size and color shared by captions.
///
/// Cloning is cheap; the font bytes are shared.
#[derive(Clone, PartialEq)]
pub struct CaptionStyle {
    font: Arc<Vec<u8>>,
    size_px: f32,
    color: [u8; 4],
    margin_px: f32,
}

impl std::fmt::Debug for CaptionStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionStyle")
            .field("font_bytes", &self.font.len())
            .field("size_px", &self.size_px)
            .field("color", &self.color)
            .field("margin_px", &self.margin_px)
            .finish()
    }
}

impl CaptionStyle {
    /// White text of `size_px` in the font given by `font_bytes` (TTF/OTF).
    ///
    /// The font is parsed once here so unusable bytes fail at construction.
    pub fn new(font_bytes: Vec<u8>, size_px: f32) -> ReelResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(format!(
                "caption size_px must be finite and > 0, got {size_px}"
            )));
        }
        let mut fonts = parley::FontContext::default();
        let families = fonts
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        if families.is_empty() {
            return Err(ReelError::validation(
                "no font families registered from caption font bytes",
            ));
        }
        Ok(Self {
            font: Arc::new(font_bytes),
            size_px,
            color: [255, 255, 255, 255],
            margin_px: size_px * 0.5,
        })
    }

    /// Set the straight-alpha RGBA text color.
    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    /// Set the gap kept between the text and the frame edges (negative values become 0).
    pub fn with_margin_px(mut self, margin_px: f32) -> Self {
        self.margin_px = if margin_px.is_finite() {
            margin_px.max(0.0)
        } else {
            0.0
        };
        self
    }

    /// Raw font bytes.
    pub fn font_bytes(&self) -> &[u8] {
        &self.font
    }

    pub(crate) fn shared_font(&self) -> &Arc<Vec<u8>> {
        &self.font
    }

    /// Font size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Straight-alpha RGBA text color.
    pub fn color(&self) -> [u8; 4] {
        self.color
    }

    /// Gap between the text and the frame edges, in pixels.
    pub fn margin_px(&self) -> f32 {
        self.margin_px
    }
}

/// Text drawn at the bottom of a slide, fading with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
    /// Text to draw. Lines wrap to the frame width.
    pub text: String,
    /// How to draw it.
    pub style: CaptionStyle,
}

impl Caption {
    /// Caption `text` drawn with `style`.
    pub fn new(text: impl Into<String>, style: CaptionStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slide/caption.rs"]
mod tests;
