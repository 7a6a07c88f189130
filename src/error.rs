//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by the rendering pipeline and the container encoders.
///
/// Degraded conditions (a zero-area blit, a size with no container
/// mapping) are deliberately *not* errors: those paths log and continue
/// so a render never aborts halfway through a preview. Only
/// configuration mistakes and encoding failures are fatal.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A shape name that is not one of the known primitives.
    ///
    /// This is a configuration error on the caller's side, not a
    /// user-recoverable condition, so the render aborts.
    #[error("unknown shape: {0:?}")]
    UnknownShape(String),

    /// A surface was requested with a zero width or height.
    #[error("surface dimensions must be positive, got {w}x{h}")]
    InvalidSurfaceSize { w: u32, h: u32 },

    /// A color string that could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// An SVG source that could not be parsed or rasterized.
    #[error("failed to rasterize svg: {0}")]
    Svg(String),

    /// PNG encoding failed.
    #[error("png encoding failed")]
    Png(#[from] image::ImageError),

    /// Manifest serialization failed.
    #[error("manifest serialization failed")]
    Json(#[from] serde_json::Error),
}
