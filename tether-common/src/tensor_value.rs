use std::fmt::Debug;

use half::{bf16, f16};
use num_complex::Complex;

use crate::{storage::Storage, Scalar, TensorType};

/// A trait for element types that have a typed host representation.
pub trait TensorValue: Debug + Copy + PartialEq + Send + Sync + 'static {
    const TENSOR_TYPE: TensorType;

    /// Borrows the elements of `storage` as `Self`.
    ///
    /// Returns `None` if `storage` does not hold elements of this type.
    fn as_slice(storage: &Storage) -> Option<&[Self]>;

    /// Builds a storage buffer from owned values.
    fn into_storage(values: Vec<Self>) -> Storage;

    /// Wraps `self` into the matching [`Scalar`] variant.
    fn into_scalar(self) -> Scalar;

    /// Unwraps a [`Scalar`] of exactly this type.
    fn from_scalar(scalar: &Scalar) -> Option<Self>;
}

macro_rules! impl_tensor_value {
    ($([$t:ty, $dtype:ident])+) => {
        $(
        impl TensorValue for $t {
            const TENSOR_TYPE: TensorType = TensorType::$dtype;

            #[inline]
            fn as_slice(storage: &Storage) -> Option<&[Self]> {
                match storage {
                    Storage::$dtype(values) => Some(values.as_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn into_storage(values: Vec<Self>) -> Storage {
                Storage::$dtype(values)
            }

            #[inline]
            fn into_scalar(self) -> Scalar {
                Scalar::$dtype(self)
            }

            #[inline]
            fn from_scalar(scalar: &Scalar) -> Option<Self> {
                match scalar {
                    Scalar::$dtype(value) => Some(*value),
                    _ => None,
                }
            }
        }

        impl From<$t> for Scalar {
            fn from(value: $t) -> Self {
                Scalar::$dtype(value)
            }
        }
        )+
    };
}

impl_tensor_value!(
    [bool,         Bool]
    [u8,           UInt8]
    [i8,           Int8]
    [i16,          Int16]
    [i32,          Int32]
    [i64,          Int64]
    [u16,          UInt16]
    [u32,          UInt32]
    [u64,          UInt64]
    [f16,          Float16]
    [bf16,         BFloat16]
    [f32,          Float32]
    [f64,          Float64]
    [Complex<f32>, Complex64]
    [Complex<f64>, Complex128]
);

/// Maps a runtime [`TensorType`] to a compile-time element type.
///
/// Expands to a `match` with one arm per scalar-capable element type. In each
/// arm `$t` is a type alias for the element type and `$body` is evaluated; it
/// must produce a [`Result`](crate::Result). Storage-only types produce
/// [`Error::Unsupported`](crate::Error::Unsupported) naming `$op`.
///
/// ```
/// use tether_common::{dispatch_scalar_types, TensorType};
///
/// let size = dispatch_scalar_types!(TensorType::Float32, "size_of", |T| {
///     Ok(std::mem::size_of::<T>())
/// });
/// assert_eq!(size.unwrap(), 4);
/// ```
#[macro_export]
macro_rules! dispatch_scalar_types {
    ($dtype:expr, $op:expr, |$t:ident| $body:expr) => {{
        match $dtype {
            $crate::TensorType::Bool => {
                type $t = bool;
                $body
            }
            $crate::TensorType::UInt8 => {
                type $t = u8;
                $body
            }
            $crate::TensorType::Int8 => {
                type $t = i8;
                $body
            }
            $crate::TensorType::Int16 => {
                type $t = i16;
                $body
            }
            $crate::TensorType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::TensorType::Int64 => {
                type $t = i64;
                $body
            }
            $crate::TensorType::UInt16 => {
                type $t = u16;
                $body
            }
            $crate::TensorType::UInt32 => {
                type $t = u32;
                $body
            }
            $crate::TensorType::UInt64 => {
                type $t = u64;
                $body
            }
            $crate::TensorType::Float16 => {
                type $t = $crate::f16;
                $body
            }
            $crate::TensorType::BFloat16 => {
                type $t = $crate::bf16;
                $body
            }
            $crate::TensorType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::TensorType::Float64 => {
                type $t = f64;
                $body
            }
            $crate::TensorType::Complex64 => {
                type $t = $crate::Complex<f32>;
                $body
            }
            $crate::TensorType::Complex128 => {
                type $t = $crate::Complex<f64>;
                $body
            }
            other => Err($crate::Error::unsupported($op, other)),
        }
    }};
}
