use crate::foundation::error::{ReelError, ReelResult};
use crate::slide::kenburns::KenBurns;
use crate::slide::record::Slide;

/// Timing-relevant view of one slide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideTiming {
    /// Narration length in microseconds (> 0).
    pub audio_duration_us: i64,
    /// Pan/zoom used to derive crop rectangles; `None` for slides without a picture.
    pub pan_zoom: Option<KenBurns>,
}

/// Immutable show timing: per-slide durations plus the two transition lengths.
///
/// The requested slide transition is clamped at construction so that it never exceeds
/// `audio_duration_us + audio_transition_us` for any slide.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    slides: Vec<SlideTiming>,
    audio_transition_us: i64,
    requested_transition_us: i64,
    transition_us: i64,
    exclusive_us: Vec<i64>,
    image_us: Vec<i64>,
    total_us: i64,
}

impl Timeline {
    /// Build a timeline, clamping the slide transition.
    pub fn new(
        slides: Vec<SlideTiming>,
        audio_transition_us: i64,
        slide_transition_us: i64,
    ) -> ReelResult<Self> {
        if slides.is_empty() {
            return Err(ReelError::validation("a show needs at least one slide"));
        }
        if audio_transition_us < 0 {
            return Err(ReelError::validation(format!(
                "audio transition must be >= 0us, got {audio_transition_us}"
            )));
        }
        if slide_transition_us < 0 {
            return Err(ReelError::validation(format!(
                "slide transition must be >= 0us, got {slide_transition_us}"
            )));
        }
        if let Some((i, s)) = slides
            .iter()
            .enumerate()
            .find(|(_, s)| s.audio_duration_us <= 0)
        {
            return Err(ReelError::validation(format!(
                "slide {i} audio duration must be > 0us, got {}",
                s.audio_duration_us
            )));
        }

        let bound = slides
            .iter()
            .map(|s| s.audio_duration_us.saturating_add(audio_transition_us))
            .min()
            .unwrap_or(slide_transition_us);
        let transition_us = slide_transition_us.min(bound);
        if transition_us != slide_transition_us {
            tracing::debug!(
                requested_us = slide_transition_us,
                corrected_us = transition_us,
                "clamped slide transition to the shortest slide"
            );
        }

        let overflow = || ReelError::validation("show duration overflows i64 microseconds");
        let mut exclusive_us = Vec::with_capacity(slides.len());
        let mut image_us = Vec::with_capacity(slides.len());
        for s in &slides {
            exclusive_us.push(
                s.audio_duration_us
                    .checked_add(audio_transition_us)
                    .and_then(|v| v.checked_sub(transition_us))
                    .ok_or_else(overflow)?,
            );
            image_us.push(
                transition_us
                    .checked_mul(2)
                    .and_then(|v| v.checked_add(s.audio_duration_us))
                    .ok_or_else(overflow)?,
            );
        }
        // Every exclusive window, the inner transitions, and the two half-length edges.
        let total_us = (slides.len() as i64 - 1)
            .checked_mul(transition_us)
            .and_then(|inner| inner.checked_add(2 * (transition_us / 2)))
            .and_then(|acc| exclusive_us.iter().try_fold(acc, |acc, &ex| acc.checked_add(ex)))
            .ok_or_else(overflow)?;

        Ok(Self {
            slides,
            audio_transition_us,
            requested_transition_us: slide_transition_us,
            transition_us,
            exclusive_us,
            image_us,
            total_us,
        })
    }

    /// Build a timeline from full slide records.
    pub fn from_slides(
        slides: &[Slide],
        audio_transition_us: i64,
        slide_transition_us: i64,
    ) -> ReelResult<Self> {
        let timings = slides
            .iter()
            .map(|s| SlideTiming {
                audio_duration_us: s.audio_duration_us(),
                pan_zoom: s.pan_zoom().copied(),
            })
            .collect();
        Self::new(timings, audio_transition_us, slide_transition_us)
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Timing data of slide `index`, if it exists.
    pub fn slide(&self, index: i64) -> Option<&SlideTiming> {
        usize::try_from(index).ok().and_then(|i| self.slides.get(i))
    }

    /// Gap appended to every slide's audio.
    pub fn audio_transition_us(&self) -> i64 {
        self.audio_transition_us
    }

    /// Slide transition as requested by the caller.
    pub fn requested_transition_us(&self) -> i64 {
        self.requested_transition_us
    }

    /// Effective (clamped) slide transition.
    pub fn transition_us(&self) -> i64 {
        self.transition_us
    }

    /// Part of slide `i`'s audio window not shared with a crossfade.
    pub fn exclusive_us(&self, i: usize) -> i64 {
        self.exclusive_us[i]
    }

    /// Span the pan/zoom of slide `i` is stretched over: both crossfades plus the audio.
    pub fn image_us(&self, i: usize) -> i64 {
        self.image_us[i]
    }

    /// Length of the transition that follows state `slide_index`.
    ///
    /// Edge transitions (out of the pre-roll and out of the last slide) are half length.
    pub fn trailing_transition_us(&self, slide_index: i64) -> i64 {
        let last = self.slides.len() as i64 - 1;
        if slide_index == -1 || slide_index == last {
            self.transition_us / 2
        } else {
            self.transition_us
        }
    }

    /// Total show length: every exclusive window plus every transition, edges included.
    pub fn total_us(&self) -> i64 {
        self.total_us
    }

    /// Start-of-show state, primed with the first slide's image duration.
    pub fn initial_state(&self) -> TimingState {
        TimingState {
            next_image_us: self.image_us(0),
            ..TimingState::pre_roll()
        }
    }

    /// Per-slide windows in show time, in slide order.
    pub fn windows(&self) -> Vec<SlideWindow> {
        let mut out = Vec::with_capacity(self.slides.len());
        let mut entering = self.trailing_transition_us(-1);
        let mut start = entering;
        for i in 0..self.slides.len() {
            let exclusive_end = start + self.exclusive_us(i);
            let trailing = self.trailing_transition_us(i as i64);
            out.push(SlideWindow {
                index: i,
                visible_start_us: start - entering,
                start_us: start,
                exclusive_end_us: exclusive_end,
                visible_end_us: exclusive_end + trailing,
            });
            start = exclusive_end + trailing;
            entering = trailing;
        }
        out
    }
}

/// Where one slide sits on the show timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlideWindow {
    /// Slide index.
    pub index: usize,
    /// Incoming transition starts (slide begins fading in).
    pub visible_start_us: i64,
    /// Incoming transition finished; the slide is the current slide from here.
    pub start_us: i64,
    /// Outgoing transition starts.
    pub exclusive_end_us: i64,
    /// Outgoing transition finished.
    pub visible_end_us: i64,
}

/// Mutable timing state of a running show.
///
/// Only [`advance`] moves it forward; it never goes backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingState {
    /// `-1` before the first slide, `0..N` while showing slides, `N` when done.
    pub slide_index: i64,
    /// Show time at which the current slide became current.
    pub slide_start_us: i64,
    /// Exclusive duration of the current slide.
    pub exclusive_us: i64,
    /// Pan/zoom span of the current slide.
    pub current_image_us: i64,
    /// Pan/zoom span of the next slide.
    pub next_image_us: i64,
    /// Set once the state moves past the last slide.
    pub done: bool,
}

impl TimingState {
    /// Unprimed state before the first slide.
    pub fn pre_roll() -> Self {
        Self {
            slide_index: -1,
            slide_start_us: 0,
            exclusive_us: 0,
            current_image_us: 0,
            next_image_us: 0,
            done: false,
        }
    }

    /// End of the current slide's exclusive window, where its outgoing transition begins.
    pub fn transition_start_us(&self) -> i64 {
        self.slide_start_us + self.exclusive_us
    }
}

/// Move `state` forward until `time_us` lies within the current slide or its outgoing transition.
///
/// Several slides may be skipped in one call when slides are shorter than a frame. Stepping past
/// the last slide sets `done`; a done state is returned unchanged.
pub fn advance(timeline: &Timeline, mut state: TimingState, time_us: i64) -> TimingState {
    let n = timeline.slide_count() as i64;
    while !state.done {
        let trailing = timeline.trailing_transition_us(state.slide_index);
        if time_us <= state.transition_start_us() + trailing {
            break;
        }

        state.slide_index += 1;
        if state.slide_index >= n {
            state.done = true;
            tracing::trace!(time_us, "show finished");
            break;
        }

        let i = state.slide_index as usize;
        state.slide_start_us = state.transition_start_us() + trailing;
        state.exclusive_us = timeline.exclusive_us(i);
        state.current_image_us = state.next_image_us;
        if i + 1 < n as usize {
            state.next_image_us = timeline.image_us(i + 1);
        }
        tracing::trace!(
            slide = i,
            start_us = state.slide_start_us,
            exclusive_us = state.exclusive_us,
            "advanced slide"
        );
    }
    state
}

#[cfg(test)]
#[path = "../../tests/unit/timing/state.rs"]
mod tests;
