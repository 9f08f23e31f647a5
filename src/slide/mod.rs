//! Per-slide data: the Ken Burns interpolator, captions, and the immutable slide record.

/// Caption text and styling.
pub mod caption;
/// Ken Burns pan/zoom interpolation.
pub mod kenburns;
/// Immutable slide record.
pub mod record;
