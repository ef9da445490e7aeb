//! Provider selection and invocation.

use std::sync::Arc;

use lanescan_core::ops::cumsum::{axis_from_selector, resolve_axis};
use lanescan_core::{ScanError, Shape, Tensor};

use crate::attrs::Attributes;
use crate::config::DispatchConfig;
use crate::policy::ExclusionPolicy;
use crate::provider::{CpuProvider, ExecutionProvider};
use crate::{DispatchError, Result};

/// Routes CumSum calls to the first eligible provider.
///
/// Providers are consulted in priority order. A provider is eligible when
/// the exclusion policy allows it for the input's dtype and its
/// capabilities admit the input's dtype and rank.
pub struct Dispatcher {
    providers: Vec<Arc<dyn ExecutionProvider>>,
    policy: ExclusionPolicy,
}

impl Dispatcher {
    /// Dispatcher over an explicit provider list, highest priority first.
    pub fn new(providers: Vec<Arc<dyn ExecutionProvider>>, policy: ExclusionPolicy) -> Self {
        Self { providers, policy }
    }

    /// CPU-only dispatcher built from configuration.
    pub fn from_config(config: &DispatchConfig) -> Result<Self> {
        let policy = ExclusionPolicy::from_rules(&config.exclusions)?;
        let cpu: Arc<dyn ExecutionProvider> = Arc::new(CpuProvider::new(config.parallel_threshold));
        Ok(Self::new(vec![cpu], policy))
    }

    /// Register a provider ahead of all existing ones.
    pub fn with_provider(mut self, provider: Arc<dyn ExecutionProvider>) -> Self {
        self.providers.insert(0, provider);
        self
    }

    pub fn providers(&self) -> impl Iterator<Item = &Arc<dyn ExecutionProvider>> {
        self.providers.iter()
    }

    pub fn policy(&self) -> &ExclusionPolicy {
        &self.policy
    }

    /// Pick the provider that will run an input of this dtype and shape.
    pub fn select(&self, input: &Tensor) -> Result<&Arc<dyn ExecutionProvider>> {
        let dtype = input.dtype();
        let shape = input.shape();
        for provider in self.providers() {
            if !self.policy.allows(provider.name(), dtype) {
                tracing::debug!(provider = provider.name(), %dtype, "provider excluded by policy");
                continue;
            }
            if !provider.supports(dtype, shape) {
                tracing::trace!(provider = provider.name(), %dtype, %shape, "provider lacks capability");
                continue;
            }
            return Ok(provider);
        }
        Err(no_provider(input.shape(), dtype))
    }

    /// Run CumSum on `input` along the axis held by `axis`, with modifiers
    /// read from `attrs`.
    ///
    /// Attributes, the selector and the axis range are checked before a
    /// provider is chosen, so errors come out in the same order as from
    /// [`Tensor::cumsum`].
    pub fn run_cumsum(&self, input: &Tensor, axis: &Tensor, attrs: &Attributes) -> Result<Tensor> {
        let config = attrs.cumsum_config()?;
        resolve_axis(axis_from_selector(axis)?, input.ndim())?;
        let provider = self.select(input)?;
        tracing::debug!(
            provider = provider.name(),
            dtype = %input.dtype(),
            shape = %input.shape(),
            exclusive = config.exclusive,
            reverse = config.reverse,
            "dispatching CumSum"
        );
        Ok(provider.cumsum(input, axis, config)?)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        let cpu: Arc<dyn ExecutionProvider> = Arc::new(CpuProvider::default());
        Self::new(vec![cpu], ExclusionPolicy::allow_all())
    }
}

fn no_provider(shape: &Shape, dtype: lanescan_core::DType) -> DispatchError {
    // Types no kernel can ever handle report as a kernel usage error.
    if !dtype.is_scannable() {
        return DispatchError::Kernel(ScanError::UnsupportedElementType(dtype));
    }
    DispatchError::NoProvider {
        dtype,
        shape: shape.clone(),
    }
}
