//! The slideshow frame compositor.

use crate::assets::image::SlideImage;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::cpu::{FrameRenderer, PreparedSlide};
use crate::render::frame::FrameRGBA;
use crate::render::text::TextLayoutEngine;
use crate::slide::caption::Caption;
use crate::slide::record::Slide;
use crate::source::{FrameSource, VideoFormat};
use crate::timing::plan::{FramePlan, plan_frame};
use crate::timing::state::{Timeline, TimingState, advance};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Created,
    Ready,
    Failed,
    Closed,
}

/// Frame source that turns slides into a pan/zoom slideshow with crossfades.
///
/// Each pull renders the frame at `frame_index / fps`: the current slide at full opacity and,
/// inside a transition, the next slide (or black at either end of the show) fading in on top.
/// The last frame is always plain black. The engine is driven to completion once and then
/// discarded.
pub struct SlideshowSource {
    format: VideoFormat,
    timeline: Timeline,
    content: Vec<(Option<SlideImage>, Option<Caption>)>,
    prepared: Vec<Option<PreparedSlide>>,
    renderer: Option<FrameRenderer>,
    phase: Phase,
    state: TimingState,
    next_frame: FrameIndex,
    last_plan: Option<FramePlan>,
}

impl SlideshowSource {
    /// Build an engine for one export.
    ///
    /// Fails on an invalid format, an empty slide list, or negative transition lengths. The
    /// requested slide transition is clamped to fit the shortest slide.
    pub fn new(
        format: VideoFormat,
        slides: Vec<Slide>,
        audio_transition_us: i64,
        slide_transition_us: i64,
    ) -> ReelResult<Self> {
        format.validate()?;
        let timeline = Timeline::from_slides(&slides, audio_transition_us, slide_transition_us)?;
        let content = slides.into_iter().map(Slide::into_content).collect();
        Ok(Self {
            format,
            timeline,
            content,
            prepared: Vec::new(),
            renderer: None,
            phase: Phase::Created,
            state: TimingState::pre_roll(),
            next_frame: FrameIndex(0),
            last_plan: None,
        })
    }

    /// Show timing, including the effective transition length.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Current timing state.
    pub fn state(&self) -> &TimingState {
        &self.state
    }

    /// Number of frames produced so far.
    pub fn frames_produced(&self) -> u64 {
        self.next_frame.0
    }

    /// Number of frames a full pass produces.
    pub fn expected_frame_count(&self) -> u64 {
        self.format.fps.frames_through_us(self.timeline.total_us())
    }

    /// Plan of the most recently produced frame.
    pub fn last_plan(&self) -> Option<&FramePlan> {
        self.last_plan.as_ref()
    }

    /// Number of slides whose pixels and caption are still held by the engine.
    ///
    /// Before `setup` that is every slide. Slides fully behind the playhead are released.
    pub fn loaded_slides(&self) -> usize {
        self.content.len() + self.prepared.iter().filter(|s| s.is_some()).count()
    }

    /// Advance to the next frame without rendering pixels.
    ///
    /// Has exactly the same effect on timing state as [`FrameSource::fill_frame`], so callers can
    /// skip ahead cheaply or inspect plans.
    pub fn plan_next(&mut self) -> ReelResult<FramePlan> {
        let plan = self.begin_frame()?;
        self.finish_frame(plan.clone());
        Ok(plan)
    }

    fn begin_frame(&mut self) -> ReelResult<FramePlan> {
        match self.phase {
            Phase::Created => return Err(ReelError::not_ready("setup has not been called")),
            Phase::Failed => return Err(ReelError::not_ready("setup failed")),
            Phase::Closed => return Err(ReelError::not_ready("source is closed")),
            Phase::Ready => {}
        }
        if self.state.done {
            return Err(ReelError::AlreadyDone);
        }

        let time_us = self.next_frame.timestamp_us(self.format.fps);
        self.state = advance(&self.timeline, self.state, time_us);
        if self.next_frame.0 + 1 >= self.expected_frame_count() {
            return Ok(FramePlan::black(time_us));
        }
        Ok(plan_frame(&self.timeline, &self.state, time_us))
    }

    fn finish_frame(&mut self, plan: FramePlan) {
        self.next_frame = FrameIndex(self.next_frame.0 + 1);

        // Look ahead so `is_done` flips as soon as the next frame would fall past the end.
        let next_time_us = self.next_frame.timestamp_us(self.format.fps);
        self.state = advance(&self.timeline, self.state, next_time_us);
        self.evict_passed_slides();

        self.last_plan = Some(plan);
    }

    fn evict_passed_slides(&mut self) {
        let keep_from = self.state.slide_index.clamp(0, self.prepared.len() as i64) as usize;
        for (i, slot) in self.prepared.iter_mut().enumerate().take(keep_from) {
            if slot.take().is_some() {
                tracing::trace!(slide = i, "released slide");
            }
        }
    }

    fn validate_slides(&self) -> ReelResult<()> {
        for (i, (image, _)) in self.content.iter().enumerate() {
            let pan_zoom = self.timeline.slide(i as i64).and_then(|s| s.pan_zoom);
            match (image, pan_zoom) {
                (Some(image), pan_zoom) => {
                    image
                        .validate()
                        .map_err(|e| ReelError::decode(format!("slide {i}: {e}")))?;
                    if let Some(pan_zoom) = pan_zoom {
                        pan_zoom
                            .validate_for(image.width(), image.height())
                            .map_err(|e| ReelError::decode(format!("slide {i}: {e}")))?;
                    }
                }
                (None, Some(_)) => {
                    return Err(ReelError::decode(format!(
                        "slide {i} has a pan/zoom but no image"
                    )));
                }
                (None, None) => {}
            }
        }
        Ok(())
    }

    /// Turn slide content into paints and shaped captions. Content is consumed on success.
    fn prepare_slides(&mut self) -> ReelResult<()> {
        self.validate_slides()?;
        let renderer = FrameRenderer::new(self.format.canvas)?;
        let mut text = TextLayoutEngine::new();
        let prepared = self
            .content
            .iter()
            .enumerate()
            .map(|(i, (image, caption))| {
                PreparedSlide::new(&mut text, self.format.canvas, image.as_ref(), caption.as_ref())
                    .map(Some)
                    .map_err(|e| match e {
                        ReelError::Decode(msg) => ReelError::decode(format!("slide {i}: {msg}")),
                        ReelError::Render(msg) => ReelError::render(format!("slide {i}: {msg}")),
                        other => other,
                    })
            })
            .collect::<ReelResult<Vec<_>>>()?;

        self.content.clear();
        self.prepared = prepared;
        self.renderer = Some(renderer);
        Ok(())
    }
}

impl std::fmt::Debug for SlideshowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideshowSource")
            .field("format", &self.format)
            .field("timeline", &self.timeline)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("next_frame", &self.next_frame)
            .field("loaded_slides", &self.loaded_slides())
            .finish_non_exhaustive()
    }
}

impl FrameSource for SlideshowSource {
    #[tracing::instrument(skip(self), fields(slides = self.timeline.slide_count()))]
    fn setup(&mut self) -> ReelResult<()> {
        match self.phase {
            Phase::Created => {}
            Phase::Ready => return Err(ReelError::validation("setup called twice")),
            Phase::Failed => return Err(ReelError::not_ready("setup failed")),
            Phase::Closed => return Err(ReelError::not_ready("source is closed")),
        }

        if let Err(e) = self.prepare_slides() {
            self.phase = Phase::Failed;
            return Err(e);
        }

        self.state = advance(&self.timeline, self.timeline.initial_state(), 0);
        self.phase = Phase::Ready;
        tracing::debug!(
            transition_us = self.timeline.transition_us(),
            total_us = self.timeline.total_us(),
            frames = self.expected_frame_count(),
            "slideshow ready"
        );
        Ok(())
    }

    fn fill_frame(&mut self, frame: &mut FrameRGBA) -> ReelResult<i64> {
        let plan = self.begin_frame()?;
        let renderer = self
            .renderer
            .as_mut()
            .ok_or_else(|| ReelError::not_ready("renderer is not prepared"))?;
        renderer.render(&plan, &self.prepared, frame)?;
        let timestamp_us = plan.timestamp_us;
        self.finish_frame(plan);
        Ok(timestamp_us)
    }

    fn output_format(&self) -> VideoFormat {
        self.format
    }

    fn is_done(&self) -> bool {
        self.state.done
    }

    fn close(&mut self) {
        if self.phase == Phase::Closed {
            return;
        }
        self.content.clear();
        self.prepared.clear();
        self.renderer = None;
        self.phase = Phase::Closed;
        tracing::debug!(frames = self.next_frame.0, "slideshow closed");
    }
}

impl Drop for SlideshowSource {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
