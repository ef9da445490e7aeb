//! Execution providers and the capability queries the dispatcher runs
//! against them.

use lanescan_core::ops::cumsum::PAR_THRESHOLD;
use lanescan_core::{CumSumConfig, DType, Shape, Tensor};

/// What a provider can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Element types the provider accepts.
    pub dtypes: Vec<DType>,
    /// Highest input rank the provider accepts, if bounded.
    pub max_rank: Option<usize>,
}

impl Capabilities {
    pub fn admits(&self, dtype: DType, shape: &Shape) -> bool {
        self.dtypes.contains(&dtype) && self.max_rank.map_or(true, |max| shape.ndim() <= max)
    }
}

/// A backend able to run CumSum.
///
/// Implementations must not encode any exclusion logic of their own; the
/// dispatcher decides which provider runs.
pub trait ExecutionProvider: Send + Sync {
    /// Stable identifier used by exclusion rules and logs.
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    fn supports(&self, dtype: DType, shape: &Shape) -> bool {
        self.capabilities().admits(dtype, shape)
    }

    fn cumsum(
        &self,
        input: &Tensor,
        axis: &Tensor,
        config: CumSumConfig,
    ) -> lanescan_core::Result<Tensor>;
}

/// Host CPU provider backed by the lane-parallel kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuProvider {
    parallel_threshold: usize,
}

impl CpuProvider {
    pub const NAME: &'static str = "cpu";

    pub fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }
}

impl Default for CpuProvider {
    fn default() -> Self {
        Self::new(PAR_THRESHOLD)
    }
}

impl ExecutionProvider for CpuProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            dtypes: vec![DType::F16, DType::F32, DType::F64, DType::I32, DType::I64],
            max_rank: None,
        }
    }

    fn cumsum(
        &self,
        input: &Tensor,
        axis: &Tensor,
        config: CumSumConfig,
    ) -> lanescan_core::Result<Tensor> {
        input.cumsum_with_threshold(axis, config, self.parallel_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_capabilities_cover_scannable_types() {
        let cpu = CpuProvider::default();
        let caps = cpu.capabilities();
        assert!(caps.dtypes.iter().all(DType::is_scannable));
        assert_eq!(caps.dtypes.len(), 5);
        assert!(cpu.supports(DType::F16, &Shape::new(&[1, 2, 3, 4, 5, 6, 7])));
        assert!(!cpu.supports(DType::BF16, &Shape::new(&[4])));
    }

    #[test]
    fn test_max_rank_bound() {
        let caps = Capabilities {
            dtypes: vec![DType::F32],
            max_rank: Some(2),
        };
        assert!(caps.admits(DType::F32, &Shape::new(&[2, 3])));
        assert!(!caps.admits(DType::F32, &Shape::new(&[2, 3, 4])));
        assert!(!caps.admits(DType::F64, &Shape::new(&[2])));
    }

    #[test]
    fn test_cpu_runs_kernel() {
        let cpu = CpuProvider::new(1);
        assert_eq!(cpu.parallel_threshold(), 1);
        let x = Tensor::from_i64(&[1, 2, 3, 4, 5, 6], &[2, 3]);
        let y = cpu
            .cumsum(&x, &Tensor::scalar_i32(0), CumSumConfig::default())
            .unwrap();
        assert_eq!(y.as_i64_slice().unwrap(), &[1, 2, 3, 5, 7, 9]);
    }
}
