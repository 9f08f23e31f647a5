//! Drivers that pull frames from a [`FrameSource`] the way an encoder stage would.

use crate::encode::sink::FrameSink;
use crate::engine::SlideshowSource;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;
use crate::source::FrameSource;

/// Options for [`pump_with`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PumpOpts {
    /// Stop after this many frames even if the source is not done.
    pub max_frames: Option<u64>,
}

/// Counters from one pump run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Frames pulled from the source and pushed to the sink.
    pub frames: u64,
    /// Timestamp of the last frame, if any.
    pub last_timestamp_us: Option<i64>,
    /// Whether the source reported completion.
    pub completed: bool,
}

/// Closes the wrapped source when dropped, on success and error paths alike.
struct CloseGuard<'a, S: FrameSource + ?Sized>(&'a mut S);

impl<S: FrameSource + ?Sized> Drop for CloseGuard<'_, S> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Pull every frame from `source` into `sink`.
pub fn pump<S, K>(source: &mut S, sink: &mut K) -> ReelResult<PumpStats>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    pump_with(source, sink, PumpOpts::default())
}

/// Pull frames from `source` into `sink` until the source is done or `opts` says stop.
///
/// Calls `setup` first and `close` exactly once on every exit path. Timestamps are checked to be
/// strictly increasing.
#[tracing::instrument(skip_all)]
pub fn pump_with<S, K>(source: &mut S, sink: &mut K, opts: PumpOpts) -> ReelResult<PumpStats>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    let guard = CloseGuard(source);
    guard.0.setup()?;

    let format = guard.0.output_format();
    let mut frame = FrameRGBA::new(format.canvas)?;
    sink.begin(format)?;

    let mut stats = PumpStats::default();
    while !guard.0.is_done() {
        if opts.max_frames.is_some_and(|max| stats.frames >= max) {
            tracing::debug!(frames = stats.frames, "pump stopped early");
            break;
        }
        let ts = guard.0.fill_frame(&mut frame)?;
        if let Some(last) = stats.last_timestamp_us
            && ts <= last
        {
            return Err(ReelError::validation(format!(
                "frame source returned non-increasing timestamp {ts}us after {last}us"
            )));
        }
        sink.push_frame(FrameIndex(stats.frames), ts, &frame)?;
        stats.frames += 1;
        stats.last_timestamp_us = Some(ts);
    }
    stats.completed = guard.0.is_done();
    sink.end()?;

    tracing::info!(
        frames = stats.frames,
        completed = stats.completed,
        "pump finished"
    );
    Ok(stats)
}

/// Render frame `idx` of a show, skipping earlier frames without drawing them.
///
/// Returns the frame's timestamp and pixels. The source is set up and closed.
pub fn render_frame_at(
    source: &mut SlideshowSource,
    idx: FrameIndex,
) -> ReelResult<(i64, FrameRGBA)> {
    let guard = CloseGuard(source);
    guard.0.setup()?;
    for _ in 0..idx.0 {
        if guard.0.is_done() {
            break;
        }
        guard.0.plan_next()?;
    }
    if guard.0.is_done() {
        return Err(ReelError::validation(format!(
            "frame {} is past the end of the show ({} frames)",
            idx.0,
            guard.0.expected_frame_count()
        )));
    }
    let mut frame = FrameRGBA::new(guard.0.output_format().canvas)?;
    let ts = guard.0.fill_frame(&mut frame)?;
    Ok((ts, frame))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
