//! Tensor operations.
//!
//! All operations return new tensors and never mutate their inputs.

pub mod cumsum;
