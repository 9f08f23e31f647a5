use smallvec::SmallVec;

use crate::foundation::core::Rect;
use crate::timing::state::{Timeline, TimingState};

/// What a single layer of a frame shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayerSource {
    /// Solid black, used for the fade from/to black outside the slide range.
    Black,
    /// A crop of slide `index`'s image scaled to the full frame, plus its caption.
    Slide {
        /// Slide index.
        index: usize,
        /// Normalized position within the slide's pan/zoom span.
        position: f32,
        /// Source crop rectangle in image pixels, `None` when the slide has no picture.
        crop: Option<Rect>,
    },
}

/// One layer drawn over the frame at `alpha`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerPlan {
    /// Layer content.
    pub source: LayerSource,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

/// Pure description of one output frame: at most two layers, bottom first.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// Presentation timestamp in microseconds.
    pub timestamp_us: i64,
    /// Layers in draw order. The first is always drawn at full opacity.
    pub layers: SmallVec<[LayerPlan; 2]>,
}

impl FramePlan {
    /// A plan that draws nothing but opaque black.
    pub fn black(timestamp_us: i64) -> Self {
        let mut layers = SmallVec::new();
        layers.push(LayerPlan {
            source: LayerSource::Black,
            alpha: 1.0,
        });
        Self {
            timestamp_us,
            layers,
        }
    }

    /// Opacity of the incoming layer, or `0` outside a transition.
    pub fn transition_alpha(&self) -> f32 {
        self.layers.get(1).map(|l| l.alpha).unwrap_or(0.0)
    }

    /// Effective coverage of black in the final frame, in `[0, 1]`.
    ///
    /// `1` means the frame is fully black, `0` means no black shows through. Captions are not
    /// counted.
    pub fn black_coverage(&self) -> f32 {
        self.layers.iter().fold(0.0f32, |acc, l| match l.source {
            LayerSource::Black | LayerSource::Slide { crop: None, .. } => {
                acc * (1.0 - l.alpha) + l.alpha
            }
            LayerSource::Slide { .. } => acc * (1.0 - l.alpha),
        })
    }
}

/// Describe the frame at `time_us` for a state already advanced to that time.
///
/// The current slide is drawn opaque with its position measured from the start of its incoming
/// transition. Inside the trailing transition the next slide is drawn on top with an alpha ramping
/// linearly from `0` to `1`.
pub fn plan_frame(timeline: &Timeline, state: &TimingState, time_us: i64) -> FramePlan {
    let transition = timeline.transition_us();
    let trailing = timeline.trailing_transition_us(state.slide_index);

    let mut layers = SmallVec::new();
    let current_offset = time_us - state.slide_start_us + transition;
    layers.push(layer(
        timeline,
        state.slide_index,
        current_offset,
        state.current_image_us,
        1.0,
    ));

    let transition_start = state.transition_start_us();
    if time_us > transition_start && trailing > 0 {
        let since = time_us - transition_start;
        // Edge transitions are half length; the next slide still starts its pan/zoom as if the
        // full transition had elapsed.
        let next_offset = since + (transition - trailing);
        let alpha = ratio(since, trailing);
        layers.push(layer(
            timeline,
            state.slide_index + 1,
            next_offset,
            state.next_image_us,
            alpha,
        ));
    }

    FramePlan {
        timestamp_us: time_us,
        layers,
    }
}

fn layer(timeline: &Timeline, index: i64, offset_us: i64, image_us: i64, alpha: f32) -> LayerPlan {
    let source = match timeline.slide(index) {
        None => LayerSource::Black,
        Some(slide) => {
            let position = ratio(offset_us, image_us);
            LayerSource::Slide {
                index: index as usize,
                position,
                crop: slide.pan_zoom.map(|k| k.interpolate(position)),
            }
        }
    };
    LayerPlan { source, alpha }
}

fn ratio(num: i64, den: i64) -> f32 {
    if den <= 0 {
        return 0.0;
    }
    ((num as f64) / (den as f64)).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
#[path = "../../tests/unit/timing/plan.rs"]
mod tests;
