pub mod copy;
mod ops;
mod tensor;

pub use copy::{CopyEngine, DeviceCopyEngine};
pub use ops::extract_scalar;
pub use tensor::Tensor;

pub use ::tether_common::{
    dispatch_scalar_types, CopyError, Device, Error, NumCast, Result, Scalar, Shape, Storage,
    TensorType, TensorValue,
};

#[cfg(test)]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
