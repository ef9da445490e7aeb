//! Cumulative sum along a single axis.
//!
//! The operation runs in three stages:
//! 1. the axis selector is read and normalised against the input rank,
//! 2. a [`LanePlan`] splits the tensor into independent 1-D lanes,
//! 3. each lane is scanned with a running accumulator.
//!
//! All validation happens before the output buffer is allocated.

use rayon::prelude::*;

use crate::dtype::DType;
use crate::element::Element;
use crate::error::ScanError;
use crate::shape::{saturating_product, Shape};
use crate::storage::Storage;
use crate::tensor::Tensor;
use crate::Result;

/// Element count above which lanes are scanned on the rayon pool.
pub const PAR_THRESHOLD: usize = 8192;

/// Minimum number of lanes per row before a single outer block is split
/// across threads. A lone lane (1-D input) is always scanned sequentially.
pub const MIN_PARALLEL_LANES: usize = 64;

/// Direction and boundary modifiers for a cumulative sum.
///
/// All four combinations are valid and distinct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CumSumConfig {
    /// Exclude the element at position `i` from output `i`.
    pub exclusive: bool,
    /// Accumulate from the last element of each lane towards the first.
    pub reverse: bool,
}

impl CumSumConfig {
    pub fn new(exclusive: bool, reverse: bool) -> Self {
        Self { exclusive, reverse }
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}

// =============================================================================
// Axis resolution
// =============================================================================

/// Extract the axis value from an axis-selector tensor.
///
/// The selector must be a 0-D or 1-D tensor holding exactly one i32 or i64.
/// Both widths are treated identically.
pub fn axis_from_selector(selector: &Tensor) -> Result<i64> {
    if selector.ndim() > 1 || selector.numel() != 1 {
        return Err(ScanError::InvalidAxisSelectorShape {
            numel: selector.numel(),
            ndim: selector.ndim(),
        });
    }
    match selector.dtype() {
        DType::I32 => selector
            .as_i32_slice()
            .map(|v| i64::from(v[0]))
            .ok_or(ScanError::InvalidAxisSelectorType(DType::I32)),
        DType::I64 => selector
            .as_i64_slice()
            .map(|v| v[0])
            .ok_or(ScanError::InvalidAxisSelectorType(DType::I64)),
        other => Err(ScanError::InvalidAxisSelectorType(other)),
    }
}

/// Normalise a possibly negative axis against `ndim`.
///
/// Negative values count from the back (`axis + ndim`). The result must lie
/// in `[0, ndim)`, so a 0-D tensor has no valid axis at all.
pub fn resolve_axis(axis: i64, ndim: usize) -> Result<usize> {
    let rank = ndim as i64;
    let resolved = if axis < 0 { axis + rank } else { axis };
    if resolved < 0 || resolved >= rank {
        return Err(ScanError::InvalidAxis { axis, ndim });
    }
    Ok(resolved as usize)
}

// =============================================================================
// Traversal planning
// =============================================================================

/// Decomposition of a row-major tensor into 1-D lanes along one axis.
///
/// A tensor of shape `[d0, .., d(axis), .., dn]` is viewed as
/// `[outer, axis_len, inner]`. Every `(outer, inner)` pair names one lane
/// whose elements sit `axis_stride == inner` apart in the buffer. Lanes
/// that share an outer index form a contiguous block of `block_len`
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanePlan {
    /// Size of the scanned dimension.
    pub axis_len: usize,
    /// Buffer distance between consecutive elements of one lane.
    pub axis_stride: usize,
    /// Product of the dimensions before the axis.
    pub outer: usize,
}

impl LanePlan {
    /// Plan the lanes of `dims` along the already-resolved `axis`.
    ///
    /// Partial products saturate rather than overflow; a shape with a zero
    /// dimension yields an empty plan regardless of its other sizes.
    ///
    /// # Panics
    /// Panics if `axis >= dims.len()`; use [`resolve_axis`] first.
    pub fn new(dims: &[usize], axis: usize) -> Self {
        Self {
            axis_len: dims[axis],
            axis_stride: saturating_product(&dims[axis + 1..]),
            outer: saturating_product(&dims[..axis]),
        }
    }

    /// Plan from a shape and a raw (possibly negative) axis.
    pub fn for_shape(shape: &Shape, axis: i64) -> Result<Self> {
        let axis = resolve_axis(axis, shape.ndim())?;
        Ok(Self::new(shape.dims(), axis))
    }

    /// Number of independent lanes: every dimension except the axis.
    pub fn lane_count(&self) -> usize {
        self.outer.saturating_mul(self.axis_stride)
    }

    /// Elements covered by one outer block.
    pub fn block_len(&self) -> usize {
        self.axis_len.saturating_mul(self.axis_stride)
    }

    /// Total number of elements covered by the plan.
    pub fn numel(&self) -> usize {
        self.outer.saturating_mul(self.block_len())
    }

    /// True when there is nothing to scan.
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Buffer offset of the first element of every lane, outer-major.
    ///
    /// An empty plan has no lanes to visit.
    pub fn lane_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        let block = self.block_len();
        let (outer, inner) = if self.is_empty() {
            (0, 0)
        } else {
            (self.outer, self.axis_stride)
        };
        (0..outer).flat_map(move |o| (0..inner).map(move |i| o * block + i))
    }
}

// =============================================================================
// Lane scanning
// =============================================================================

/// Scan one lane of `input` into `output`.
///
/// The lane starts at `base` and holds `plan.axis_len` elements spaced
/// `plan.axis_stride` apart. A single accumulator, seeded with the identity,
/// walks the lane in the configured direction. Inclusive mode adds before
/// writing, exclusive mode writes before adding.
pub fn scan_lane<T: Element>(
    input: &[T],
    output: &mut [T],
    base: usize,
    plan: &LanePlan,
    config: CumSumConfig,
) {
    let len = plan.axis_len;
    let stride = plan.axis_stride;
    let mut acc = T::zero();
    for step in 0..len {
        let k = if config.reverse { len - 1 - step } else { step };
        let idx = base + k * stride;
        let value = input[idx];
        if config.exclusive {
            output[idx] = acc;
            acc = acc.accumulate(value);
        } else {
            acc = acc.accumulate(value);
            output[idx] = acc;
        }
    }
}

/// Scan every lane of a typed buffer, returning a fresh output buffer.
///
/// Above `par_threshold` elements the output is split into disjoint outer
/// blocks that are scanned on the rayon pool. With a single outer block the
/// lanes are instead advanced together one row at a time, each row split
/// across threads. Each lane is still walked in order, so every path
/// produces identical results.
pub fn cumsum_slice<T: Element>(
    input: &[T],
    plan: &LanePlan,
    config: CumSumConfig,
    par_threshold: usize,
) -> Vec<T> {
    let mut output = vec![T::zero(); input.len()];
    if plan.is_empty() {
        return output;
    }

    let block = plan.block_len();
    let inner = plan.axis_stride;
    let parallel = input.len() >= par_threshold;
    if parallel && plan.outer > 1 {
        output
            .par_chunks_mut(block)
            .zip(input.par_chunks(block))
            .for_each(|(out_block, in_block)| {
                for i in 0..inner {
                    scan_lane(in_block, out_block, i, plan, config);
                }
            });
    } else if parallel && inner >= MIN_PARALLEL_LANES {
        scan_rows_parallel(input, &mut output, plan, config);
    } else {
        for base in plan.lane_offsets() {
            scan_lane(input, &mut output, base, plan, config);
        }
    }
    output
}

/// Scan the lanes of a single outer block row by row.
///
/// Row `k` holds element `k` of every lane, contiguously. One accumulator
/// per lane is carried from row to row, and each row is split into tiles
/// scanned on the rayon pool.
fn scan_rows_parallel<T: Element>(
    input: &[T],
    output: &mut [T],
    plan: &LanePlan,
    config: CumSumConfig,
) {
    let len = plan.axis_len;
    let inner = plan.axis_stride;
    let tile = (inner / rayon::current_num_threads()).max(MIN_PARALLEL_LANES);
    let mut acc = vec![T::zero(); inner];
    for step in 0..len {
        let k = if config.reverse { len - 1 - step } else { step };
        let row = k * inner..(k + 1) * inner;
        acc.par_chunks_mut(tile)
            .zip(output[row.clone()].par_chunks_mut(tile))
            .zip(input[row].par_chunks(tile))
            .for_each(|((lanes, out), inp)| {
                for ((a, o), &value) in lanes.iter_mut().zip(out.iter_mut()).zip(inp) {
                    if config.exclusive {
                        *o = *a;
                        *a = a.accumulate(value);
                    } else {
                        *a = a.accumulate(value);
                        *o = *a;
                    }
                }
            });
    }
}

fn cumsum_typed<T: Element>(
    input: &Tensor,
    plan: &LanePlan,
    config: CumSumConfig,
    par_threshold: usize,
) -> Result<Tensor> {
    let data = input
        .as_slice::<T>()
        .ok_or(ScanError::UnsupportedElementType(input.dtype()))?;
    let output = cumsum_slice(data, plan, config, par_threshold);
    Tensor::from_storage(Storage::from_vec(output), input.shape().dims())
}

impl Tensor {
    /// Cumulative sum along the axis named by a 0-D or single-element 1-D
    /// integer tensor.
    ///
    /// ```
    /// use lanescan_core::{ops::cumsum::CumSumConfig, Tensor};
    ///
    /// let x = Tensor::from_f32(&[1.0, 2.0, 3.0, 4.0, 5.0], &[5]);
    /// let y = x.cumsum(&Tensor::scalar_i32(0), CumSumConfig::default()).unwrap();
    /// assert_eq!(y.as_f32_slice().unwrap(), &[1.0, 3.0, 6.0, 10.0, 15.0]);
    /// ```
    pub fn cumsum(&self, axis: &Tensor, config: CumSumConfig) -> Result<Tensor> {
        self.cumsum_with_threshold(axis, config, PAR_THRESHOLD)
    }

    /// [`Tensor::cumsum`] with an explicit lane-parallelism threshold.
    pub fn cumsum_with_threshold(
        &self,
        axis: &Tensor,
        config: CumSumConfig,
        par_threshold: usize,
    ) -> Result<Tensor> {
        let axis = axis_from_selector(axis)?;
        self.cumsum_axis_with_threshold(axis, config, par_threshold)
    }

    /// Cumulative sum along a plain integer axis (negative counts from the back).
    pub fn cumsum_axis(&self, axis: i64, config: CumSumConfig) -> Result<Tensor> {
        self.cumsum_axis_with_threshold(axis, config, PAR_THRESHOLD)
    }

    fn cumsum_axis_with_threshold(
        &self,
        axis: i64,
        config: CumSumConfig,
        par_threshold: usize,
    ) -> Result<Tensor> {
        let plan = LanePlan::for_shape(self.shape(), axis)?;
        match self.dtype() {
            DType::F16 => cumsum_typed::<half::f16>(self, &plan, config, par_threshold),
            DType::F32 => cumsum_typed::<f32>(self, &plan, config, par_threshold),
            DType::F64 => cumsum_typed::<f64>(self, &plan, config, par_threshold),
            DType::I32 => cumsum_typed::<i32>(self, &plan, config, par_threshold),
            DType::I64 => cumsum_typed::<i64>(self, &plan, config, par_threshold),
            other => Err(ScanError::UnsupportedElementType(other)),
        }
    }
}
