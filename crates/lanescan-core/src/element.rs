//! Element types the cumulative-sum kernel computes on.
//!
//! Each type contributes exactly two things to the kernel: its additive
//! identity and its native addition. Everything else about the scan is
//! shared.

use std::fmt::Debug;

use half::f16;

use crate::dtype::DType;
use crate::storage::StorageData;

/// A scannable tensor element.
pub trait Element: bytemuck::Pod + Send + Sync + PartialEq + Debug + 'static {
    /// Tag stored alongside buffers of this type.
    const DTYPE: DType;

    /// Additive identity, used to seed every lane.
    fn zero() -> Self;

    /// Native-width addition. Integers wrap on overflow.
    fn accumulate(self, rhs: Self) -> Self;

    /// Borrow a typed view of storage holding this element type.
    fn slice(data: &StorageData) -> Option<&[Self]>;

    /// Wrap an owned buffer in the matching storage variant.
    fn wrap(values: Vec<Self>) -> StorageData;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident, $zero:expr, |$a:ident, $b:ident| $add:expr) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn zero() -> Self {
                $zero
            }

            #[inline]
            fn accumulate(self, rhs: Self) -> Self {
                let ($a, $b) = (self, rhs);
                $add
            }

            fn slice(data: &StorageData) -> Option<&[Self]> {
                match data {
                    StorageData::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn wrap(values: Vec<Self>) -> StorageData {
                StorageData::$variant(values)
            }
        }
    };
}

impl_element!(f16, F16, f16::ZERO, |a, b| a + b);
impl_element!(f32, F32, 0.0, |a, b| a + b);
impl_element!(f64, F64, 0.0, |a, b| a + b);
impl_element!(i32, I32, 0, |a, b| a.wrapping_add(b));
impl_element!(i64, I64, 0, |a, b| a.wrapping_add(b));
