use half::{bf16, f16};
use num_complex::Complex;

use crate::TensorType;

/// Host-side element buffer of a tensor.
///
/// Scalar-capable element types are stored in a typed vector. Types with no
/// native Rust representation (half-precision complex, quantized, float8) are
/// kept as raw little-endian bytes tagged with their element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Bool(Vec<bool>),
    UInt8(Vec<u8>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float16(Vec<f16>),
    BFloat16(Vec<bf16>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Complex64(Vec<Complex<f32>>),
    Complex128(Vec<Complex<f64>>),
    Raw { dtype: TensorType, bytes: Vec<u8> },
}

macro_rules! storage_match {
    ($self:expr, |$v:ident| $body:expr, raw |$dtype:ident, $bytes:ident| $raw:expr) => {
        match $self {
            Storage::Bool($v) => $body,
            Storage::UInt8($v) => $body,
            Storage::Int8($v) => $body,
            Storage::Int16($v) => $body,
            Storage::Int32($v) => $body,
            Storage::Int64($v) => $body,
            Storage::UInt16($v) => $body,
            Storage::UInt32($v) => $body,
            Storage::UInt64($v) => $body,
            Storage::Float16($v) => $body,
            Storage::BFloat16($v) => $body,
            Storage::Float32($v) => $body,
            Storage::Float64($v) => $body,
            Storage::Complex64($v) => $body,
            Storage::Complex128($v) => $body,
            Storage::Raw {
                dtype: $dtype,
                bytes: $bytes,
            } => $raw,
        }
    };
}

impl Storage {
    pub fn dtype(&self) -> TensorType {
        use TensorType::*;

        match self {
            Self::Bool(_) => Bool,
            Self::UInt8(_) => UInt8,
            Self::Int8(_) => Int8,
            Self::Int16(_) => Int16,
            Self::Int32(_) => Int32,
            Self::Int64(_) => Int64,
            Self::UInt16(_) => UInt16,
            Self::UInt32(_) => UInt32,
            Self::UInt64(_) => UInt64,
            Self::Float16(_) => Float16,
            Self::BFloat16(_) => BFloat16,
            Self::Float32(_) => Float32,
            Self::Float64(_) => Float64,
            Self::Complex64(_) => Complex64,
            Self::Complex128(_) => Complex128,
            Self::Raw { dtype, .. } => *dtype,
        }
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        storage_match!(self, |v| v.len(), raw |dtype, bytes| bytes.len() / dtype.element_size())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the buffer in bytes.
    pub fn nbytes(&self) -> usize {
        self.len() * self.dtype().element_size()
    }

    /// Zero-initialized buffer holding `len` elements of type `dtype`.
    pub fn zeros(dtype: TensorType, len: usize) -> Self {
        use TensorType::*;

        match dtype {
            Bool => Self::Bool(vec![false; len]),
            UInt8 => Self::UInt8(vec![0; len]),
            Int8 => Self::Int8(vec![0; len]),
            Int16 => Self::Int16(vec![0; len]),
            Int32 => Self::Int32(vec![0; len]),
            Int64 => Self::Int64(vec![0; len]),
            UInt16 => Self::UInt16(vec![0; len]),
            UInt32 => Self::UInt32(vec![0; len]),
            UInt64 => Self::UInt64(vec![0; len]),
            Float16 => Self::Float16(vec![f16::ZERO; len]),
            BFloat16 => Self::BFloat16(vec![bf16::ZERO; len]),
            Float32 => Self::Float32(vec![0.0; len]),
            Float64 => Self::Float64(vec![0.0; len]),
            Complex64 => Self::Complex64(vec![Complex::new(0.0, 0.0); len]),
            Complex128 => Self::Complex128(vec![Complex::new(0.0, 0.0); len]),
            Complex32 | QInt8 | QUInt8 | QInt32 | Float8E5M2 | Float8E4M3Fn => Self::Raw {
                dtype,
                bytes: vec![0; len * dtype.element_size()],
            },
        }
    }

    /// Wraps raw element bytes of a type without a typed representation.
    pub fn from_raw_bytes(dtype: TensorType, bytes: Vec<u8>) -> crate::Result<Self> {
        if dtype.is_scalar_supported() {
            return Err(crate::Error::unsupported("from_raw_bytes", dtype));
        }
        if bytes.len() % dtype.element_size() != 0 {
            return Err(crate::Error::Parse(format!(
                "{} bytes as {} elements",
                bytes.len(),
                dtype
            )));
        }
        Ok(Self::Raw { dtype, bytes })
    }
}

#[cfg(test)]
mod test {
    use super::Storage;
    use crate::TensorType;

    #[test]
    fn test_zeros() {
        let s = Storage::zeros(TensorType::Float16, 3);
        assert_eq!(s.dtype(), TensorType::Float16);
        assert_eq!(s.len(), 3);
        assert_eq!(s.nbytes(), 6);

        let s = Storage::zeros(TensorType::QInt32, 2);
        assert_eq!(s.dtype(), TensorType::QInt32);
        assert_eq!(s.len(), 2);
        assert_eq!(s.nbytes(), 8);
    }

    #[test]
    fn test_raw_bytes() {
        let s = Storage::from_raw_bytes(TensorType::Complex32, vec![0; 8]).unwrap();
        assert_eq!(s.len(), 2);
        assert!(Storage::from_raw_bytes(TensorType::Complex32, vec![0; 6]).is_err());
        assert!(Storage::from_raw_bytes(TensorType::Float32, vec![0; 4]).is_err());
    }
}
