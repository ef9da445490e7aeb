//! Convenience re-exports for common lanescan-core types.
//!
//! ```rust
//! use lanescan_core::prelude::*;
//! ```

pub use crate::CumSumConfig;
pub use crate::DType;
pub use crate::Element;
pub use crate::Result;
pub use crate::ScanError;
pub use crate::Shape;
pub use crate::Tensor;
