//! Ken Burns pan/zoom: a crop rectangle over the source image that moves linearly over a slide's
//! visible window.

use crate::foundation::core::Rect;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::lerp;

/// Pan/zoom interpolator between two crop rectangles in source-image pixel space.
///
/// `start` is sampled when the slide first becomes visible (`position = 0`) and `end` when its
/// outgoing transition finishes (`position = 1`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KenBurns {
    /// Crop rectangle at `position = 0`.
    pub start: Rect,
    /// Crop rectangle at `position = 1`.
    pub end: Rect,
}

impl KenBurns {
    /// Pan/zoom from `start` to `end`.
    pub fn new(start: Rect, end: Rect) -> Self {
        Self { start, end }
    }

    /// A motionless crop.
    pub fn still(rect: Rect) -> Self {
        Self::new(rect, rect)
    }

    /// Show the whole image without motion.
    pub fn full_image(width: u32, height: u32) -> Self {
        Self::still(Rect::new(0.0, 0.0, f64::from(width), f64::from(height)))
    }

    /// Crop rectangle at `position`, interpolating each edge linearly.
    ///
    /// `position` is clamped to `[0, 1]`; NaN is treated as `0`.
    pub fn interpolate(&self, position: f32) -> Rect {
        let t = if position.is_nan() {
            0.0
        } else {
            f64::from(position.clamp(0.0, 1.0))
        };
        Rect::new(
            lerp(self.start.x0, self.end.x0, t),
            lerp(self.start.y0, self.end.y0, t),
            lerp(self.start.x1, self.end.x1, t),
            lerp(self.start.y1, self.end.y1, t),
        )
    }

    /// Check both rectangles have positive area and lie within a `width x height` image.
    pub fn validate_for(&self, width: u32, height: u32) -> ReelResult<()> {
        let bounds = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        for (name, r) in [("start", self.start), ("end", self.end)] {
            let finite = [r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite());
            if !finite || r.x1 <= r.x0 || r.y1 <= r.y0 {
                return Err(ReelError::validation(format!(
                    "ken burns {name} rect must have positive area, got {r:?}"
                )));
            }
            if r.x0 < bounds.x0 || r.y0 < bounds.y0 || r.x1 > bounds.x1 || r.y1 > bounds.y1 {
                return Err(ReelError::validation(format!(
                    "ken burns {name} rect {r:?} exceeds image bounds {width}x{height}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slide/kenburns.rs"]
mod tests;
