use std::fmt::Display;

use half::{bf16, f16};
use num_complex::Complex;
use num_traits::{NumCast, ToPrimitive};

use crate::{TensorType, TensorValue};

/// A single host-resident value of any scalar-capable element type.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "dtype", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Bool(bool),
    #[serde(rename = "uint8")]
    UInt8(u8),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    #[serde(rename = "uint16")]
    UInt16(u16),
    #[serde(rename = "uint32")]
    UInt32(u32),
    #[serde(rename = "uint64")]
    UInt64(u64),
    Float16(f16),
    #[serde(rename = "bfloat16")]
    BFloat16(bf16),
    Float32(f32),
    Float64(f64),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
}

macro_rules! scalar_match {
    ($self:expr, real |$v:ident| $real:expr, complex |$c:ident| $complex:expr) => {
        match $self {
            Scalar::Bool($v) => {
                let $v = &<u8 as From<bool>>::from(*$v);
                $real
            }
            Scalar::UInt8($v) => $real,
            Scalar::Int8($v) => $real,
            Scalar::Int16($v) => $real,
            Scalar::Int32($v) => $real,
            Scalar::Int64($v) => $real,
            Scalar::UInt16($v) => $real,
            Scalar::UInt32($v) => $real,
            Scalar::UInt64($v) => $real,
            Scalar::Float16($v) => $real,
            Scalar::BFloat16($v) => $real,
            Scalar::Float32($v) => $real,
            Scalar::Float64($v) => $real,
            Scalar::Complex64($c) => $complex,
            Scalar::Complex128($c) => $complex,
        }
    };
}

impl Scalar {
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
        }
    }

    /// Returns the stored value if it is exactly of type `T`.
    pub fn get<T: TensorValue>(&self) -> Option<T> {
        T::from_scalar(self)
    }

    /// Converts the stored value to `T`.
    ///
    /// Returns `None` if the value is not representable in `T` or if it is a
    /// complex number with a non-zero imaginary part.
    pub fn to<T: NumCast>(&self) -> Option<T> {
        scalar_match!(
            self,
            real |v| <T as NumCast>::from(*v),
            complex |c| if c.im == 0.0 { <T as NumCast>::from(c.re) } else { None }
        )
    }

    pub fn to_f64(&self) -> Option<f64> {
        scalar_match!(
            self,
            real |v| ToPrimitive::to_f64(v),
            complex |c| if c.im == 0.0 { ToPrimitive::to_f64(&c.re) } else { None }
        )
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to()
    }

    /// Truthiness of the stored value; non-zero values are `true`.
    pub fn to_bool(&self) -> bool {
        match self {
            Self::Bool(v) => *v,
            Self::Complex64(c) => c.re != 0.0 || c.im != 0.0,
            Self::Complex128(c) => c.re != 0.0 || c.im != 0.0,
            other => other.to_f64().map_or(false, |v| v != 0.0),
        }
    }

    pub fn is_complex(&self) -> bool {
        self.dtype().is_complex()
    }

    pub fn is_floating_point(&self) -> bool {
        self.dtype().is_floating_point()
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => v.fmt(f),
            Self::UInt8(v) => v.fmt(f),
            Self::Int8(v) => v.fmt(f),
            Self::Int16(v) => v.fmt(f),
            Self::Int32(v) => v.fmt(f),
            Self::Int64(v) => v.fmt(f),
            Self::UInt16(v) => v.fmt(f),
            Self::UInt32(v) => v.fmt(f),
            Self::UInt64(v) => v.fmt(f),
            Self::Float16(v) => v.fmt(f),
            Self::BFloat16(v) => v.fmt(f),
            Self::Float32(v) => v.fmt(f),
            Self::Float64(v) => v.fmt(f),
            Self::Complex64(v) => v.fmt(f),
            Self::Complex128(v) => v.fmt(f),
        }
    }
}
