//! # lanescan-core
//!
//! Dense tensors and the cumulative-sum kernel.
//!
//! Provides:
//! - An immutable, contiguous `Tensor` over five scannable element types
//!   (F16, F32, F64, I32, I64) plus raw storage for the rest
//! - Axis normalisation, lane planning and lane scanning for
//!   inclusive/exclusive, forward/reverse cumulative sums
//! - Lane-parallel execution on the rayon pool for large inputs

pub mod dtype;
pub mod element;
pub mod storage;
pub mod shape;
pub mod tensor;
pub mod ops;
pub mod error;
pub mod prelude;

pub use dtype::DType;
pub use element::Element;
pub use storage::Storage;
pub use shape::Shape;
pub use tensor::Tensor;
pub use error::ScanError;
pub use ops::cumsum::CumSumConfig;

pub type Result<T> = std::result::Result<T, ScanError>;
