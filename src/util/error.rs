//! Error types for dpmdetect.

use thiserror::Error;

/// Result alias for dpmdetect operations.
pub type DetectResult<T> = std::result::Result<T, DetectError>;

/// Errors that can occur while building inputs or constructing a detector.
///
/// Per-image detection never fails; every variant here is raised either at
/// adapter construction or at detector construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than a packed row.
    #[error("invalid stride: row needs {row_len} bytes, stride is {stride}")]
    InvalidStride { row_len: usize, stride: usize },
    /// Backing buffer is too small for the requested view.
    #[error("buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A configuration value is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// The model file could not be opened or read.
    #[error("failed to read model {path}: {reason}")]
    ModelIo { path: String, reason: String },
    /// The model file is not a valid mixture description.
    #[error("failed to parse model: {reason}")]
    ModelParse { reason: String },
    /// The mixture has no components.
    #[error("mixture model has no components")]
    EmptyModel,
    /// A root filter's declared geometry does not match its weights.
    #[error("invalid filter for component {component}: {reason}")]
    InvalidFilter {
        component: usize,
        reason: &'static str,
    },
    /// The shared transform plan could not be sized for the image bound.
    #[error("failed to build transform plan: {reason}")]
    TransformPlan { reason: &'static str },
    /// Image decoding or encoding failed.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
}
