use std::fmt;

use half::f16;
use crate::dtype::DType;
use crate::element::Element;
use crate::error::ScanError;
use crate::shape::Shape;
use crate::storage::{Storage, StorageData};
use crate::Result;

/// A dense, contiguous, row-major multi-dimensional array.
///
/// Tensors are immutable: operations read their inputs and return freshly
/// allocated outputs. Cloning shares the underlying storage.
///
/// # Examples
///
/// ```
/// use lanescan_core::Tensor;
///
/// let t = Tensor::from_f32(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
/// assert_eq!(t.shape().dims(), &[2, 2]);
/// assert_eq!(t.numel(), 4);
/// ```
#[derive(Clone)]
pub struct Tensor {
    storage: Storage,
    shape: Shape,
}

impl Tensor {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a tensor from an owned buffer, checking it against `shape`.
    pub fn new<T: Element>(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let s = Shape::new(shape);
        if checked_numel(&s)? != data.len() {
            return Err(ScanError::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(Self::from_parts(Storage::from_vec(data), s))
    }

    /// Create a tensor from pre-built storage and shape.
    pub fn from_storage(storage: Storage, shape: &[usize]) -> Result<Self> {
        let s = Shape::new(shape);
        if checked_numel(&s)? != storage.numel() {
            return Err(ScanError::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![storage.numel()],
            });
        }
        Ok(Self::from_parts(storage, s))
    }

    /// Create a tensor of zeros with the given shape and dtype.
    ///
    /// # Panics
    /// Panics if the element count of `shape` cannot be allocated.
    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        let s = Shape::new(shape);
        Self::from_parts(Storage::zeros(dtype, s.numel()), s)
    }

    /// Create a tensor from f32 data with the given shape.
    ///
    /// # Panics
    /// Panics if `data.len()` does not match the element count of `shape`.
    pub fn from_f32(data: &[f32], shape: &[usize]) -> Self {
        Self::from_slice_checked(data, shape)
    }

    /// Create a tensor from f64 data with the given shape.
    pub fn from_f64(data: &[f64], shape: &[usize]) -> Self {
        Self::from_slice_checked(data, shape)
    }

    /// Create a tensor from half-precision data with the given shape.
    pub fn from_f16(data: &[f16], shape: &[usize]) -> Self {
        Self::from_slice_checked(data, shape)
    }

    /// Create a tensor from i32 data with the given shape.
    pub fn from_i32(data: &[i32], shape: &[usize]) -> Self {
        Self::from_slice_checked(data, shape)
    }

    /// Create a tensor from i64 data with the given shape.
    pub fn from_i64(data: &[i64], shape: &[usize]) -> Self {
        Self::from_slice_checked(data, shape)
    }

    /// 0-D i32 tensor, the usual form of an axis selector.
    pub fn scalar_i32(value: i32) -> Self {
        Self::from_parts(Storage::from_vec(vec![value]), Shape::scalar())
    }

    /// 0-D i64 tensor.
    pub fn scalar_i64(value: i64) -> Self {
        Self::from_parts(Storage::from_vec(vec![value]), Shape::scalar())
    }

    fn from_slice_checked<T: Element>(data: &[T], shape: &[usize]) -> Self {
        let s = Shape::new(shape);
        assert_eq!(
            s.numel(),
            data.len(),
            "Shape {:?} requires {} elements, got {}",
            shape,
            s.numel(),
            data.len()
        );
        Self::from_parts(Storage::from_vec(data.to_vec()), s)
    }

    fn from_parts(storage: Storage, shape: Shape) -> Self {
        Self { storage, shape }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Shape of the tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Data type.
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Underlying shared storage.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    // =========================================================================
    // Data access
    // =========================================================================

    /// Borrow the data as a typed slice, or None on dtype mismatch.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        self.storage.as_slice()
    }

    /// Copy the data out as a typed vector, or None on dtype mismatch.
    pub fn to_vec<T: Element>(&self) -> Option<Vec<T>> {
        self.as_slice().map(<[T]>::to_vec)
    }

    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        self.as_slice()
    }

    pub fn as_f64_slice(&self) -> Option<&[f64]> {
        self.as_slice()
    }

    pub fn as_f16_slice(&self) -> Option<&[f16]> {
        self.as_slice()
    }

    pub fn as_i32_slice(&self) -> Option<&[i32]> {
        self.as_slice()
    }

    pub fn as_i64_slice(&self) -> Option<&[i64]> {
        self.as_slice()
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={}, dtype={})",
            self.shape,
            self.dtype(),
        )
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.storage.data() {
            StorageData::F16(v) => write_values(f, v, &self.shape),
            StorageData::F32(v) => write_values(f, v, &self.shape),
            StorageData::F64(v) => write_values(f, v, &self.shape),
            StorageData::I32(v) => write_values(f, v, &self.shape),
            StorageData::I64(v) => write_values(f, v, &self.shape),
            StorageData::Raw(_) => {
                write!(f, "tensor(shape={}, dtype={})", self.shape, self.dtype())
            }
        }
    }
}

fn checked_numel(shape: &Shape) -> Result<usize> {
    shape.checked_numel().ok_or_else(|| ScanError::ShapeOverflow {
        shape: shape.dims().to_vec(),
    })
}

fn write_values<T: fmt::Debug>(f: &mut fmt::Formatter<'_>, data: &[T], shape: &Shape) -> fmt::Result {
    if data.len() <= 20 {
        write!(f, "tensor({:?}, shape={})", data, shape)
    } else {
        write!(
            f,
            "tensor([{:?}, {:?}, ..., {:?}], shape={})",
            data[0],
            data[1],
            data[data.len() - 1],
            shape
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f32() {
        let t = Tensor::from_f32(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        assert_eq!(t.shape().dims(), &[2, 3]);
        assert_eq!(t.ndim(), 2);
        assert_eq!(t.numel(), 6);
        assert_eq!(t.dtype(), DType::F32);
    }

    #[test]
    fn test_new_checks_length() {
        let err = Tensor::new(vec![1i32, 2, 3], &[2, 2]).unwrap_err();
        assert_eq!(
            err,
            ScanError::ShapeMismatch {
                expected: vec![2, 2],
                got: vec![3],
            }
        );
    }

    #[test]
    fn test_new_rejects_overflowing_shape() {
        let huge = usize::MAX / 2 + 1;
        let err = Tensor::new(Vec::<f32>::new(), &[huge, 2]).unwrap_err();
        assert_eq!(err, ScanError::ShapeOverflow { shape: vec![huge, 2] });

        let storage = Storage::from_vec(Vec::<i64>::new());
        assert!(matches!(
            Tensor::from_storage(storage, &[2, huge, 3]),
            Err(ScanError::ShapeOverflow { .. })
        ));
    }

    #[test]
    fn test_empty_with_huge_dims_is_accepted() {
        let t = Tensor::new(Vec::<i32>::new(), &[usize::MAX, usize::MAX, 0]).unwrap();
        assert_eq!(t.numel(), 0);
        assert_eq!(t.shape().dims(), &[usize::MAX, usize::MAX, 0]);
    }

    #[test]
    fn test_from_storage_checks_length() {
        let storage = Storage::zeros(DType::I8, 4);
        assert!(Tensor::from_storage(storage.clone(), &[2, 2]).is_ok());
        assert!(Tensor::from_storage(storage, &[5]).is_err());
    }

    #[test]
    fn test_zeros() {
        let t = Tensor::zeros(&[3, 4], DType::I64);
        assert_eq!(t.numel(), 12);
        assert!(t.as_i64_slice().unwrap().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_empty_tensor() {
        let t = Tensor::from_f32(&[], &[2, 0, 3]);
        assert_eq!(t.numel(), 0);
        assert_eq!(t.as_f32_slice().unwrap(), &[] as &[f32]);
    }

    #[test]
    fn test_scalar_selectors() {
        let a = Tensor::scalar_i32(-1);
        assert_eq!(a.ndim(), 0);
        assert_eq!(a.as_i32_slice().unwrap(), &[-1]);

        let b = Tensor::scalar_i64(2);
        assert_eq!(b.dtype(), DType::I64);
        assert_eq!(b.numel(), 1);
    }

    #[test]
    fn test_typed_access_rejects_mismatch() {
        let t = Tensor::from_i32(&[1, 2], &[2]);
        assert!(t.as_f32_slice().is_none());
        assert_eq!(t.to_vec::<i32>(), Some(vec![1, 2]));
    }

    #[test]
    fn test_debug_display() {
        let t = Tensor::from_f32(&[1.0, 2.0], &[2]);
        let debug = format!("{:?}", t);
        assert!(debug.contains("Tensor"));
        assert!(debug.contains("f32"));

        let display = format!("{}", t);
        assert_eq!(display, "tensor([1.0, 2.0], shape=[2])");

        let raw = Tensor::zeros(&[2], DType::U8);
        assert_eq!(format!("{}", raw), "tensor(shape=[2], dtype=u8)");
    }
}
