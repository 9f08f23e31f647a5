use crate::foundation::core::FrameIndex;
use crate::foundation::error::ReelResult;
use crate::render::frame::FrameRGBA;
use crate::source::VideoFormat;

/// Sink contract for consuming frames pulled from a [`crate::FrameSource`].
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex` and timestamp.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, format: VideoFormat) -> ReelResult<()>;
    /// Push one frame with its presentation timestamp in microseconds.
    fn push_frame(&mut self, idx: FrameIndex, timestamp_us: i64, frame: &FrameRGBA)
    -> ReelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ReelResult<()>;
}

/// One frame captured by [`InMemorySink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Frame index.
    pub idx: FrameIndex,
    /// Presentation timestamp in microseconds.
    pub timestamp_us: i64,
    /// Pixels.
    pub frame: FrameRGBA,
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    format: Option<VideoFormat>,
    frames: Vec<CapturedFrame>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the format captured in `begin`, if any.
    pub fn format(&self) -> Option<VideoFormat> {
        self.format
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, format: VideoFormat) -> ReelResult<()> {
        self.format = Some(format);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        timestamp_us: i64,
        frame: &FrameRGBA,
    ) -> ReelResult<()> {
        self.frames.push(CapturedFrame {
            idx,
            timestamp_us,
            frame: frame.clone(),
        });
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.ended = true;
        Ok(())
    }
}
