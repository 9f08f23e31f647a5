use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::Rect;

/// Microseconds per second.
pub const US_PER_SEC: i64 = 1_000_000;

/// 0-based index of a frame pulled from a frame source.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Presentation timestamp of this frame in microseconds.
    pub fn timestamp_us(self, fps: Fps) -> i64 {
        fps.frame_time_us(self.0)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    ///
    /// Rates above one frame per microsecond are rejected since consecutive timestamps would no
    /// longer be strictly increasing.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        let fps = Self { num, den };
        fps.validate()?;
        Ok(fps)
    }

    /// Check the invariants enforced by [`Fps::new`].
    ///
    /// Values deserialized from a manifest bypass `new`, so callers re-check here.
    pub fn validate(self) -> ReelResult<()> {
        if self.den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if self.num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        if u64::from(self.num) > (US_PER_SEC as u64) * u64::from(self.den) {
            return Err(ReelError::validation(
                "Fps must not exceed 1_000_000 frames per second",
            ));
        }
        Ok(())
    }

    /// Exact timestamp of frame `frame` in microseconds (floor of `frame * den / num` seconds).
    pub fn frame_time_us(self, frame: u64) -> i64 {
        let us = u128::from(frame) * (US_PER_SEC as u128) * u128::from(self.den)
            / u128::from(self.num);
        i64::try_from(us).unwrap_or(i64::MAX)
    }

    /// Number of frame timestamps that fall within `[0, duration_us]`.
    pub fn frames_through_us(self, duration_us: i64) -> u64 {
        if duration_us < 0 {
            return 0;
        }
        // Frame `k` is included when `floor(k * unit / num) <= duration`, i.e.
        // `k * unit < (duration + 1) * num`.
        let unit = (US_PER_SEC as u128) * u128::from(self.den);
        let frames = ((duration_us as u128 + 1) * u128::from(self.num)).div_ceil(unit);
        u64::try_from(frames).unwrap_or(u64::MAX)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Size in bytes of a tightly packed RGBA8 buffer for this canvas.
    pub fn rgba8_len(self) -> ReelResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ReelError::validation("canvas buffer size overflow"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
