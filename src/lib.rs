//! storyreel composes narrated story slideshows into video frames.
//!
//! Each slide is an image shown for the length of its narration, animated with a Ken Burns
//! pan/zoom and joined to its neighbours by crossfades. The show fades in from black and out to
//! black. Frames are pulled one at a time through the [`FrameSource`] contract:
//!
//! - Build [`Slide`]s directly, or load a [`ShowManifest`] and
//!   [`prepare`](ShowManifest::prepare) it
//! - Create a [`SlideshowSource`]
//! - Pull frames yourself, or [`pump`] them into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

/// Frame sinks.
pub mod encode;
/// The slideshow frame source.
pub mod engine;
/// JSON show manifests.
pub mod manifest;
/// Frame pumping helpers.
pub mod pipeline;
/// CPU compositing.
pub mod render;
/// Slide records, captions and pan/zoom.
pub mod slide;
/// The frame source contract.
pub mod source;
/// Show timing and frame plans.
pub mod timing;

pub use crate::assets::decode::{decode_image, load_image};
pub use crate::assets::image::SlideImage;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rect, US_PER_SEC};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{CapturedFrame, FrameSink, InMemorySink};
pub use crate::engine::SlideshowSource;
pub use crate::manifest::{CaptionsDef, PreparedShow, ShowManifest, SlideDef};
pub use crate::pipeline::{PumpOpts, PumpStats, pump, pump_with, render_frame_at};
pub use crate::render::frame::FrameRGBA;
pub use crate::slide::caption::{Caption, CaptionStyle};
pub use crate::slide::kenburns::KenBurns;
pub use crate::slide::record::Slide;
pub use crate::source::{FrameSource, VideoFormat};
pub use crate::timing::plan::{FramePlan, LayerPlan, LayerSource, plan_frame};
pub use crate::timing::state::{SlideTiming, SlideWindow, Timeline, TimingState, advance};
