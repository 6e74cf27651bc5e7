//! Device copy collaborator.
//!
//! Extraction and device transfers only go through the [`CopyEngine`] trait so
//! a real accelerator backend can be plugged in. [`DeviceCopyEngine`] is the
//! in-process implementation used by the runtime and the tests.

use std::{
    collections::HashSet,
    fmt::Debug,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{CopyError, Device, Error, Tensor};

pub trait CopyEngine: Debug + Send + Sync {
    /// Copies the elements of `src` into `dst` and returns the updated `dst`.
    ///
    /// `dst` and `src` must have the same element type and shape. The copy is
    /// complete when this returns unless `non_blocking` is set and the engine
    /// supports asynchronous transfers.
    fn copy_(&self, dst: Tensor, src: &Tensor, non_blocking: bool) -> crate::Result<Tensor>;
}

#[derive(Debug)]
pub struct DeviceCopyEngine {
    devices: HashSet<Device>,
    transfers: AtomicUsize,
}

impl DeviceCopyEngine {
    /// Creates an engine with the given accelerators attached. The host is always attached.
    pub fn new<I>(devices: I) -> Self
    where
        I: IntoIterator<Item = Device>,
    {
        let mut devices = devices.into_iter().collect::<HashSet<_>>();
        devices.insert(Device::Cpu);
        Self {
            devices,
            transfers: AtomicUsize::new(0),
        }
    }

    pub fn host_only() -> Self {
        Self::new([])
    }

    pub fn is_available(&self, device: Device) -> bool {
        self.devices.contains(&device)
    }

    /// Number of completed cross-device transfers.
    pub fn transfers(&self) -> usize {
        self.transfers.load(Ordering::Acquire)
    }

    fn check_device(&self, device: Device) -> crate::Result<()> {
        if self.is_available(device) {
            Ok(())
        } else {
            Err(Error::DeviceUnavailable(device))
        }
    }
}

impl Default for DeviceCopyEngine {
    fn default() -> Self {
        Self::host_only()
    }
}

impl CopyEngine for DeviceCopyEngine {
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(src = %src.device(), dst = %dst.device(), dtype = %src.dtype())
    )]
    fn copy_(&self, dst: Tensor, src: &Tensor, non_blocking: bool) -> crate::Result<Tensor> {
        self.check_device(src.device())?;
        self.check_device(dst.device())?;
        if dst.dtype() != src.dtype() {
            return Err(CopyError::dtype_mismatch(dst.dtype(), src.dtype()).into());
        }
        if dst.shape() != src.shape() {
            return Err(CopyError::shape_mismatch(dst.shape(), src.shape()).into());
        }
        if non_blocking && dst.device().is_cpu() {
            // Device-to-host copies must be visible as soon as this returns.
            tracing::trace!("ignoring non_blocking for copy to host");
        }

        let dst = dst.with_storage(src.storage().clone());
        if src.device() != dst.device() {
            self.transfers.fetch_add(1, Ordering::AcqRel);
        }
        tracing::trace!(bytes = src.storage().nbytes(), "copy complete");
        Ok(dst)
    }
}

#[cfg(test)]
mod test {
    use crate::{CopyEngine, CopyError, Device, DeviceCopyEngine, Error, Tensor};

    #[test]
    fn test_round_trip() {
        crate::init_tracing();
        let engine = DeviceCopyEngine::new([Device::Mps(0)]);
        let t = Tensor::from_vec(vec![1i16, 2, 3], [3]).unwrap();

        let d = t.to(Device::Mps(0), &engine).unwrap();
        assert_eq!(d.device(), Device::Mps(0));
        assert!(!d.shares_storage(&t));
        let h = d.to(Device::Cpu, &engine).unwrap();
        assert_eq!(h, t);
        assert_eq!(engine.transfers(), 2);
    }

    #[test]
    fn test_unavailable() {
        let engine = DeviceCopyEngine::host_only();
        let t = Tensor::scalar(1.0f32);
        let err = t.to(Device::Mps(1), &engine).unwrap_err();
        assert!(matches!(err, Error::DeviceUnavailable(Device::Mps(1))));
        assert_eq!(engine.transfers(), 0);
    }

    #[test]
    fn test_mismatch() {
        let engine = DeviceCopyEngine::default();
        let src = Tensor::from_vec(vec![1.0f32, 2.0], [2]).unwrap();

        let like = Tensor::from_vec(vec![0.0f64, 0.0], [2]).unwrap();
        let dst = Tensor::empty_like(&like, Device::Cpu);
        let err = engine.copy_(dst, &src, false).unwrap_err();
        assert!(matches!(err, Error::Copy(CopyError::DtypeMismatch { .. })));

        let like = Tensor::from_vec(vec![0.0f32, 0.0], [1, 2]).unwrap();
        let dst = Tensor::empty_like(&like, Device::Cpu);
        let err = engine.copy_(dst, &src, true).unwrap_err();
        assert!(matches!(err, Error::Copy(CopyError::ShapeMismatch { .. })));
    }
}
