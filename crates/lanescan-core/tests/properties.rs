//! Algebraic relations between the four cumulative-sum modes.

use lanescan_core::ops::cumsum::LanePlan;
use lanescan_core::{CumSumConfig, Tensor};

const SHAPES: &[&[usize]] = &[&[7], &[3, 5], &[2, 3, 4], &[4, 1, 3], &[2, 2, 1, 3], &[1, 6]];

fn sample(shape: &[usize]) -> Tensor {
    let numel: usize = shape.iter().product();
    let data: Vec<i64> = (0..numel as i64).map(|v| (v * 37 + 11) % 19 - 9).collect();
    Tensor::from_i64(&data, shape)
}

fn scan(x: &Tensor, axis: i64, exclusive: bool, reverse: bool) -> Vec<i64> {
    x.cumsum_axis(axis, CumSumConfig::new(exclusive, reverse))
        .unwrap()
        .to_vec::<i64>()
        .unwrap()
}

#[test]
fn test_inclusive_is_exclusive_plus_input() {
    for &shape in SHAPES {
        let x = sample(shape);
        let input = x.as_i64_slice().unwrap();
        for axis in 0..shape.len() as i64 {
            for reverse in [false, true] {
                let inc = scan(&x, axis, false, reverse);
                let exc = scan(&x, axis, true, reverse);
                for i in 0..input.len() {
                    assert_eq!(inc[i], exc[i] + input[i], "shape {shape:?} axis {axis} i {i}");
                }
            }
        }
    }
}

#[test]
fn test_reverse_inclusive_is_total_minus_forward_exclusive() {
    for &shape in SHAPES {
        let x = sample(shape);
        for axis in 0..shape.len() {
            let fwd_exc = scan(&x, axis as i64, true, false);
            let fwd_inc = scan(&x, axis as i64, false, false);
            let rev_inc = scan(&x, axis as i64, false, true);

            let plan = LanePlan::new(shape, axis);
            for base in plan.lane_offsets() {
                let last = base + (plan.axis_len - 1) * plan.axis_stride;
                let total = fwd_inc[last];
                for k in 0..plan.axis_len {
                    let idx = base + k * plan.axis_stride;
                    assert_eq!(rev_inc[idx], total - fwd_exc[idx], "shape {shape:?} axis {axis}");
                }
            }
        }
    }
}

#[test]
fn test_single_element_axis() {
    let x = sample(&[3, 1, 4]);
    let input = x.to_vec::<i64>().unwrap();
    for reverse in [false, true] {
        assert_eq!(scan(&x, 1, false, reverse), input);
        assert_eq!(scan(&x, 1, true, reverse), vec![0; input.len()]);
    }
}

#[test]
fn test_negative_axis_equivalence() {
    for &shape in SHAPES {
        let x = sample(shape);
        let rank = shape.len() as i64;
        for axis in 0..rank {
            for (exclusive, reverse) in [(false, false), (true, false), (false, true), (true, true)] {
                assert_eq!(
                    scan(&x, axis, exclusive, reverse),
                    scan(&x, axis - rank, exclusive, reverse),
                    "shape {shape:?} axis {axis}"
                );
            }
        }
    }
}

#[test]
fn test_selector_width_is_irrelevant() {
    let x = sample(&[2, 3, 4]);
    for axis in -3..3i32 {
        let a = x.cumsum(&Tensor::scalar_i32(axis), CumSumConfig::default()).unwrap();
        let b = x
            .cumsum(&Tensor::from_i64(&[i64::from(axis)], &[1]), CumSumConfig::default())
            .unwrap();
        assert_eq!(a.as_i64_slice(), b.as_i64_slice());
    }
}

#[test]
fn test_large_parallel_input_matches_small_threshold() {
    let x = sample(&[64, 33, 9]);
    for axis in 0..3 {
        for (exclusive, reverse) in [(false, false), (true, true)] {
            let config = CumSumConfig::new(exclusive, reverse);
            let selector = Tensor::scalar_i64(axis);
            let seq = x.cumsum_with_threshold(&selector, config, usize::MAX).unwrap();
            let par = x.cumsum_with_threshold(&selector, config, 1).unwrap();
            assert_eq!(seq.as_i64_slice(), par.as_i64_slice(), "axis {axis}");
        }
    }
}

#[test]
fn test_float_accumulates_in_sequence() {
    // Naive left-to-right f32 summation, no compensation.
    let data = [1.0e8f32, 1.0, -1.0e8, 1.0];
    let x = Tensor::from_f32(&data, &[4]);
    let y = x.cumsum_axis(0, CumSumConfig::default()).unwrap();
    let mut acc = 0.0f32;
    let expected: Vec<f32> = data
        .iter()
        .map(|&v| {
            acc += v;
            acc
        })
        .collect();
    assert_eq!(y.as_f32_slice().unwrap(), expected.as_slice());
}

#[test]
fn test_integer_overflow_wraps() {
    let x = Tensor::from_i32(&[i32::MAX, 1, 1], &[3]);
    let y = x.cumsum_axis(0, CumSumConfig::default()).unwrap();
    assert_eq!(y.as_i32_slice().unwrap(), &[i32::MAX, i32::MIN, i32::MIN + 1]);
}
