//! # lanescan-dispatch
//!
//! Routes CumSum invocations to an execution provider.
//!
//! Provides:
//! - Decoding of the integer `exclusive`/`reverse` attributes
//! - The `ExecutionProvider` capability-query trait and the CPU provider
//! - Per-provider, per-dtype exclusion policy
//! - JSON-backed dispatch configuration
//!
//! The kernel itself lives in `lanescan-core` and behaves identically
//! whichever provider invokes it.

pub mod attrs;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod policy;
pub mod provider;

pub use attrs::{AttrValue, Attributes};
pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use policy::{ExclusionPolicy, ExclusionRule};
pub use provider::{Capabilities, CpuProvider, ExecutionProvider};

pub type Result<T> = std::result::Result<T, DispatchError>;
