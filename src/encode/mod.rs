//! Frame sinks.
//!
//! Sinks consume frames in show order and are driven by [`crate::pipeline::pump`]. Video
//! encoding and muxing live outside this crate; the sinks here exist for tests and debugging.

/// PNG frame-dump sink.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
