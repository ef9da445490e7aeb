use std::sync::Arc;

use half::f16;

use crate::element::Element;
use crate::DType;

/// Typed backing buffer for tensor data.
///
/// Scannable element types get their own variant so the kernel can borrow a
/// properly aligned `&[T]`. Other dtypes are kept as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageData {
    F16(Vec<f16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    /// Element types the kernel does not compute on.
    Raw(Vec<u8>),
}

/// Shared, reference-counted, read-only tensor storage.
///
/// Cloning a `Storage` is an `Arc` clone; the data itself is never copied
/// or mutated after construction.
#[derive(Debug, Clone)]
pub struct Storage {
    data: Arc<StorageData>,
    dtype: DType,
    /// Number of logical elements (not bytes).
    numel: usize,
}

impl Storage {
    /// Build storage from an owned typed buffer.
    pub fn from_vec<T: Element>(values: Vec<T>) -> Self {
        let numel = values.len();
        Self {
            data: Arc::new(T::wrap(values)),
            dtype: T::DTYPE,
            numel,
        }
    }

    /// Allocate zero-filled storage for `numel` elements of the given dtype.
    pub fn zeros(dtype: DType, numel: usize) -> Self {
        let data = match dtype {
            DType::F16 => StorageData::F16(vec![f16::ZERO; numel]),
            DType::F32 => StorageData::F32(vec![0.0; numel]),
            DType::F64 => StorageData::F64(vec![0.0; numel]),
            DType::I32 => StorageData::I32(vec![0; numel]),
            DType::I64 => StorageData::I64(vec![0; numel]),
            other => StorageData::Raw(vec![0u8; other.storage_bytes(numel)]),
        };
        Self {
            data: Arc::new(data),
            dtype,
            numel,
        }
    }

    /// Get the dtype of this storage.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of logical elements.
    pub fn numel(&self) -> usize {
        self.numel
    }

    /// Borrow the data as a typed slice. Returns None if `T` does not match
    /// the stored dtype.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }

    /// Get the raw StorageData reference.
    pub fn data(&self) -> &StorageData {
        self.data.as_ref()
    }
}
