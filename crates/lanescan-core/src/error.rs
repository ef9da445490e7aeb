use crate::DType;

/// Errors raised while validating or running a tensor operation.
///
/// Every variant is detected before any output buffer is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("axis {axis} is out of range for a {ndim}D tensor")]
    InvalidAxis { axis: i64, ndim: usize },

    #[error("axis selector must hold exactly one value in a 0D or 1D tensor, got {numel} elements in {ndim}D")]
    InvalidAxisSelectorShape { numel: usize, ndim: usize },

    #[error("axis selector must be i32 or i64, got {0}")]
    InvalidAxisSelectorType(DType),

    #[error("unsupported element type: {0}")]
    UnsupportedElementType(DType),

    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },

    #[error("shape {shape:?} holds more elements than fit in memory")]
    ShapeOverflow { shape: Vec<usize> },
}
