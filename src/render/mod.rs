//! CPU rendering of frame plans into RGBA8 buffers.
//!
//! Slides are drawn with `vello_cpu`: each image becomes an image paint scaled so its crop fills
//! the canvas, captions are shaped once with Parley and drawn as glyph runs inside the slide's
//! opacity layer.

pub(crate) mod cpu;
/// Frame buffer type.
pub mod frame;
pub(crate) mod text;
