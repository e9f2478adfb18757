//! Errors raised while configuring a visibility grid.

use thiserror::Error;

/// Configuration errors. These are only produced when a grid is built or
/// reconfigured; the per-tick update never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FogError {
    /// Resolution must be between one and `MAX_RESOLUTION` cells per side
    #[error("grid resolution must be between 1 and {max}, got {0}", max = crate::mapping::MAX_RESOLUTION)]
    InvalidResolution(u32),
    /// World size must be finite, strictly positive, and large enough to invert
    #[error("world size must be finite and positive, got {0}")]
    InvalidWorldSize(f32),
    /// World center must have finite coordinates
    #[error("world center must be finite, got ({x}, {y})")]
    InvalidWorldCenter { x: f32, y: f32 },
}
