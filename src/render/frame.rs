use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// A frame buffer as RGBA8 pixels.
///
/// Frames filled by the engine are **premultiplied** and fully opaque. The buffer is owned by
/// whoever pulls frames; the engine only writes into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Allocate an opaque black frame for `canvas`.
    pub fn new(canvas: Canvas) -> ReelResult<Self> {
        let len = canvas.rgba8_len()?;
        let mut data = vec![0u8; len];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        })
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    pub(crate) fn check_matches(&self, canvas: Canvas) -> ReelResult<()> {
        if self.width != canvas.width || self.height != canvas.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                self.width, self.height, canvas.width, canvas.height
            )));
        }
        if self.data.len() != canvas.rgba8_len()? {
            return Err(ReelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        Ok(())
    }
}
