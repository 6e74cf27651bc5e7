pub mod device;
pub mod error;
mod scalar;
pub mod storage;
mod tensor_type;
mod tensor_value;

pub use crate::device::Device;
pub use crate::scalar::Scalar;
pub use crate::storage::Storage;
pub use crate::tensor_type::TensorType;
pub use crate::tensor_value::TensorValue;
pub use error::{CopyError, Error, Result};

pub use half::{bf16, f16};
pub use num_complex::Complex;
pub use num_traits::NumCast;

pub type Shape = smallvec::SmallVec<[usize; 4]>;
