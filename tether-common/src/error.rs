use crate::{Device, TensorType};

pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error("\"{op}\" not implemented for '{dtype}'")]
    Unsupported { op: &'static str, dtype: TensorType },
    #[error("a tensor with {0} elements cannot be converted to a scalar")]
    NotScalar(usize),
    #[error("expected tensor of type {expected} but found {actual}")]
    DataType {
        expected: TensorType,
        actual: TensorType,
    },
    #[error("expected {expected} elements but found {actual}")]
    ElementCount { expected: usize, actual: usize },
    #[error("device {0} is not available")]
    DeviceUnavailable(Device),
    #[error("tensor data on {0} is not host-accessible")]
    HostAccess(Device),
    #[error("failed to cast scalar of type {from} to {to}")]
    Cast { to: &'static str, from: TensorType },
    #[error("null tensor handle")]
    NullHandle,
    #[error("null output pointer")]
    NullPointer,
    #[error("tensor handle {0:#x} does not refer to a live tensor")]
    InvalidHandle(u64),
    #[error("handle registry is full ({0} live handles)")]
    HandleLimit(usize),
    #[error("global runtime already initialized")]
    AlreadyInitialized,
    #[error("failed to parse {0}")]
    Parse(String),
    #[error("serialization error")]
    Serialization(BoxError),
}

impl Error {
    pub fn unsupported(op: &'static str, dtype: TensorType) -> Self {
        Self::Unsupported { op, dtype }
    }

    pub fn cast(to: &'static str, from: TensorType) -> Self {
        Self::Cast { to, from }
    }

    pub fn data_type(expected: TensorType, actual: TensorType) -> Self {
        Self::DataType { expected, actual }
    }

    pub fn element_count(expected: usize, actual: usize) -> Self {
        Self::ElementCount { expected, actual }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(Box::new(value))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("cannot copy tensor of type {src} into tensor of type {dst}")]
    DtypeMismatch { dst: TensorType, src: TensorType },
    #[error("cannot copy tensor with shape {src:?} into tensor with shape {dst:?}")]
    ShapeMismatch { dst: Vec<usize>, src: Vec<usize> },
}

impl CopyError {
    pub fn dtype_mismatch(dst: TensorType, src: TensorType) -> Self {
        Self::DtypeMismatch { dst, src }
    }

    pub fn shape_mismatch(dst: &[usize], src: &[usize]) -> Self {
        Self::ShapeMismatch {
            dst: dst.to_vec(),
            src: src.to_vec(),
        }
    }
}
