//! Error kinds for the rendering core.
//!
//! Per the fail-silent-and-continue contract with clients (a malformed draw
//! must never crash another client's window), most [`crate::painter::Painter`]
//! and [`crate::engine::DrawingEngine`] methods do not return [`PaintError`]
//! directly — they fold failures into an empty touched rectangle and emit a
//! `tracing` event. `PaintError` exists for the few operations that do need
//! to report failure to their caller (bitmap allocation, font loading) and
//! for the diagnostic readback mentioned in the spec.

use thiserror::Error;

/// The five failure kinds the rendering core distinguishes internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaintError {
    /// Empty rect, degenerate polygon, out-of-range arc span (already clamped
    /// by the time this variant would be observed).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The draw was entirely outside the current clip.
    #[error("draw clipped away")]
    ClippedAway,

    /// A font face could not be loaded, or a bitmap has no backing bits.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// The frame buffer was detached between lock acquisition and the write.
    #[error("frame buffer detached")]
    BufferGone,

    /// Out-of-memory (or equivalent) while rasterizing a primitive large
    /// enough to require a scratch buffer.
    #[error("fatal rasterization error: {0}")]
    Fatal(String),
}

pub type PaintResult<T> = Result<T, PaintError>;

/// Records a non-fatal error kind via `tracing` and returns `()`, matching
/// the "record for later diagnostic readback... no exception or signal is
/// raised" contract of the spec. Call sites that would otherwise bubble a
/// `PaintError` up through a `Result` funnel it here instead.
pub(crate) fn log_silent(err: &PaintError) {
    match err {
        PaintError::InvalidGeometry(_) | PaintError::ClippedAway => {
            tracing::trace!(%err, "draw call touched nothing");
        }
        PaintError::ResourceUnavailable(_) | PaintError::BufferGone => {
            tracing::warn!(%err, "draw call skipped");
        }
        PaintError::Fatal(_) => {
            tracing::error!(%err, "draw call aborted");
        }
    }
}
