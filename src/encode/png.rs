use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::FrameSink;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;
use crate::source::VideoFormat;

/// Sink that writes every `every`-th frame as `frame_000123.png` into a directory.
///
/// Frames produced by the engine are opaque, so premultiplied and straight alpha coincide and
/// the bytes are written as-is.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    every: u64,
    format: Option<VideoFormat>,
    last_idx: Option<FrameIndex>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Write every frame into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            every: 1,
            format: None,
            last_idx: None,
            written: Vec::new(),
        }
    }

    /// Only write frames whose index is a multiple of `every` (0 is treated as 1).
    pub fn with_every(mut self, every: u64) -> Self {
        self.every = every.max(1);
        self
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File name used for frame `idx`.
    pub fn file_name(idx: FrameIndex) -> String {
        format!("frame_{:06}.png", idx.0)
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, format: VideoFormat) -> ReelResult<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory '{}'", self.dir.display())
        })?;
        self.format = Some(format);
        self.last_idx = None;
        self.written.clear();
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        _timestamp_us: i64,
        frame: &FrameRGBA,
    ) -> ReelResult<()> {
        let format = self
            .format
            .ok_or_else(|| ReelError::not_ready("png sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ReelError::validation(
                "png sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);
        frame.check_matches(format.canvas)?;

        if !idx.0.is_multiple_of(self.every) {
            return Ok(());
        }
        let path = self.dir.join(Self::file_name(idx));
        write_png(&path, frame)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        if self.format.take().is_none() {
            return Err(ReelError::not_ready("png sink not started"));
        }
        tracing::info!(
            dir = %self.dir.display(),
            files = self.written.len(),
            "wrote png frames"
        );
        Ok(())
    }
}

/// Write one frame as a PNG file.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> ReelResult<()> {
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
