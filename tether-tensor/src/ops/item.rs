use crate::{CopyEngine, Device, Error, Scalar, Tensor, TensorValue};

/// Reads the single element of an accelerator-resident tensor into a host [`Scalar`].
///
/// The element type is resolved to a concrete Rust type before any transfer.
/// A zero-filled host tensor shaped like `tensor` is allocated, filled through
/// a blocking `engine` copy, and its only element is read back. Copy failures
/// are returned unchanged.
pub fn extract_scalar(tensor: &Tensor, engine: &dyn CopyEngine) -> crate::Result<Scalar> {
    let numel = tensor.numel();
    if numel != 1 {
        return Err(Error::NotScalar(numel));
    }
    tracing::debug!(dtype = %tensor.dtype(), device = %tensor.device(), "extracting scalar");
    crate::dispatch_scalar_types!(tensor.dtype(), "local_scalar_dense", |T| {
        read_scalar::<T>(tensor, engine)
    })
}

fn read_scalar<T: TensorValue>(tensor: &Tensor, engine: &dyn CopyEngine) -> crate::Result<Scalar> {
    let host = Tensor::empty_like(tensor, Device::Cpu);
    let host = engine.copy_(host, tensor, false)?;
    let value = host
        .data::<T>()?
        .first()
        .copied()
        .ok_or(Error::NotScalar(0))?;
    Ok(value.into_scalar())
}
