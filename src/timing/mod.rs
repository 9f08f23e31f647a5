//! Show timing: transition clamping, the slide state machine, and per-frame layer plans.
//!
//! Everything here is pure. Given the same [`state::Timeline`] and timestamps, [`state::advance`]
//! and [`plan::plan_frame`] always produce the same states and plans, which is what makes the
//! engine deterministic and testable without touching pixels.

/// Per-frame layer plans.
pub mod plan;
/// Timeline configuration and the slide state machine.
pub mod state;
