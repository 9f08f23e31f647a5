//! The pull-style contract between a frame producer and a video encoder.

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;

/// Output parameters fixed when a frame source is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoFormat {
    /// Output dimensions.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
}

impl VideoFormat {
    /// Create a validated format.
    pub fn new(width: u32, height: u32, fps: Fps) -> ReelResult<Self> {
        let format = Self {
            canvas: Canvas { width, height },
            fps,
        };
        format.validate()?;
        Ok(format)
    }

    /// Check dimensions are non-zero and the frame rate is usable.
    pub fn validate(&self) -> ReelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::validation(format!(
                "video width/height must be non-zero, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(ReelError::validation(format!(
                "video width/height must be at most {}, got {}x{}",
                u16::MAX,
                self.canvas.width,
                self.canvas.height
            )));
        }
        self.canvas.rgba8_len()?;
        self.fps.validate()
    }
}

/// A source of video frames pulled one at a time by an encoder.
///
/// Call order: [`setup`](FrameSource::setup) once, then
/// [`fill_frame`](FrameSource::fill_frame) until [`is_done`](FrameSource::is_done) returns `true`,
/// then [`close`](FrameSource::close). Implementations are single-threaded; every mutating call
/// takes `&mut self`.
pub trait FrameSource {
    /// One-time initialization. A failure is terminal.
    fn setup(&mut self) -> ReelResult<()>;

    /// Write the next frame into `frame` and return its presentation timestamp in microseconds.
    ///
    /// Timestamps are strictly increasing across calls.
    fn fill_frame(&mut self, frame: &mut FrameRGBA) -> ReelResult<i64>;

    /// Output format decided at construction.
    fn output_format(&self) -> VideoFormat;

    /// `true` once every frame of the show has been produced.
    fn is_done(&self) -> bool;

    /// Release transient resources. Safe to call more than once.
    fn close(&mut self);
}
