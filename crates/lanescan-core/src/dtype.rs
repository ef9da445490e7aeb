use std::fmt;

/// Element types a tensor can carry.
///
/// Only a subset is accepted by the cumulative-sum kernel (see
/// [`DType::is_scannable`]); the rest exist so callers can hand the kernel a
/// tensor it must reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 16-bit IEEE 754 half-precision float
    F16,
    /// 16-bit Brain Float (same exponent range as F32, reduced mantissa)
    BF16,
    /// 32-bit IEEE 754 single-precision float
    F32,
    /// 64-bit IEEE 754 double-precision float
    F64,
    /// 8-bit signed integer
    I8,
    /// 8-bit unsigned integer
    U8,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
}

impl DType {
    /// Size in bytes of a single element.
    pub fn element_size(&self) -> usize {
        match self {
            DType::F16 | DType::BF16 => 2,
            DType::F32 | DType::I32 => 4,
            DType::F64 | DType::I64 => 8,
            DType::I8 | DType::U8 => 1,
        }
    }

    /// Number of bytes needed to store `n` elements of this dtype,
    /// saturating at `usize::MAX`.
    pub fn storage_bytes(&self, n: usize) -> usize {
        self.element_size().saturating_mul(n)
    }

    /// Whether the cumulative-sum kernel accepts this dtype.
    pub fn is_scannable(&self) -> bool {
        matches!(
            self,
            DType::F16 | DType::F32 | DType::F64 | DType::I32 | DType::I64
        )
    }

    /// Parse the short lowercase name produced by `Display`.
    pub fn from_name(name: &str) -> Option<DType> {
        let dtype = match name {
            "f16" => DType::F16,
            "bf16" => DType::BF16,
            "f32" => DType::F32,
            "f64" => DType::F64,
            "i8" => DType::I8,
            "u8" => DType::U8,
            "i32" => DType::I32,
            "i64" => DType::I64,
            _ => return None,
        };
        Some(dtype)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F16 => write!(f, "f16"),
            DType::BF16 => write!(f, "bf16"),
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
            DType::I8 => write!(f, "i8"),
            DType::U8 => write!(f, "u8"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
        }
    }
}
