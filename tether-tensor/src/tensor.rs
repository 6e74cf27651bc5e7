use std::sync::Arc;

use smallvec::SmallVec;

use crate::{CopyEngine, Device, Error, Scalar, Shape, Storage, TensorType, TensorValue};

/// Runtime-typed, contiguous tensor.
///
/// Cloning a tensor is cheap: the element buffer is shared.
#[derive(Debug, Clone)]
pub struct Tensor {
    shape: Shape,
    strides: Shape,
    device: Device,
    storage: Arc<Storage>,
}

fn default_strides(shape: &[usize]) -> Shape {
    let mut strides: Shape = SmallVec::from_elem(1, shape.len());
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

impl Tensor {
    pub fn new<S>(storage: Storage, shape: S, device: Device) -> crate::Result<Self>
    where
        S: AsRef<[usize]>,
    {
        let shape = Shape::from_slice(shape.as_ref());
        let numel = shape.iter().product::<usize>();
        if numel != storage.len() {
            return Err(Error::element_count(numel, storage.len()));
        }
        let strides = default_strides(&shape);
        Ok(Self {
            shape,
            strides,
            device,
            storage: Arc::new(storage),
        })
    }

    /// Host tensor from a vector of values.
    pub fn from_vec<T, S>(values: Vec<T>, shape: S) -> crate::Result<Self>
    where
        T: TensorValue,
        S: AsRef<[usize]>,
    {
        Self::new(T::into_storage(values), shape, Device::Cpu)
    }

    /// Zero-dimensional host tensor holding `value`.
    pub fn scalar<T: TensorValue>(value: T) -> Self {
        Self {
            shape: Shape::new(),
            strides: Shape::new(),
            device: Device::Cpu,
            storage: Arc::new(T::into_storage(vec![value])),
        }
    }

    /// Host tensor of a storage-only element type from raw element bytes.
    pub fn from_raw_bytes<S>(dtype: TensorType, bytes: Vec<u8>, shape: S) -> crate::Result<Self>
    where
        S: AsRef<[usize]>,
    {
        Self::new(Storage::from_raw_bytes(dtype, bytes)?, shape, Device::Cpu)
    }

    /// Zero-filled tensor with the shape and element type of `other`, placed on `device`.
    pub fn empty_like(other: &Tensor, device: Device) -> Self {
        Self {
            shape: other.shape.clone(),
            strides: other.strides.clone(),
            device,
            storage: Arc::new(Storage::zeros(other.dtype(), other.numel())),
        }
    }

    #[inline]
    pub fn dtype(&self) -> TensorType {
        self.storage.dtype()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    #[inline]
    pub fn device(&self) -> Device {
        self.device
    }

    #[doc(hidden)]
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Whether `self` and `other` share the same element buffer.
    pub fn shares_storage(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    /// Borrows the elements as `T`.
    ///
    /// Fails if the tensor does not live on the host or does not hold `T`.
    pub fn data<T: TensorValue>(&self) -> crate::Result<&[T]> {
        if !self.device.is_cpu() {
            return Err(Error::HostAccess(self.device));
        }
        T::as_slice(&self.storage).ok_or_else(|| Error::data_type(T::TENSOR_TYPE, self.dtype()))
    }

    pub fn to_vec<T: TensorValue>(&self) -> crate::Result<Vec<T>> {
        self.data::<T>().map(<[T]>::to_vec)
    }

    /// Returns a tensor with the same metadata backed by `storage`.
    pub(crate) fn with_storage(mut self, storage: Storage) -> Self {
        debug_assert_eq!(storage.dtype(), self.dtype());
        debug_assert_eq!(storage.len(), self.numel());
        self.storage = Arc::new(storage);
        self
    }

    /// Copies `self` to `device` through `engine`.
    pub fn to(&self, device: Device, engine: &dyn CopyEngine) -> crate::Result<Self> {
        if device == self.device {
            return Ok(self.clone());
        }
        engine.copy_(Tensor::empty_like(self, device), self, false)
    }

    /// Reads the single element of this tensor.
    ///
    /// Host tensors are read in place; accelerator tensors are first copied to
    /// the host through `engine`.
    pub fn item(&self, engine: &dyn CopyEngine) -> crate::Result<Scalar> {
        if self.device.is_cpu() {
            let numel = self.numel();
            if numel != 1 {
                return Err(Error::NotScalar(numel));
            }
            crate::dispatch_scalar_types!(self.dtype(), "item", |T| self
                .data::<T>()
                .map(|values| values[0].into_scalar()))
        } else {
            crate::extract_scalar(self, engine)
        }
    }

    /// Reads the single element of this tensor converted to `T`.
    pub fn item_as<T>(&self, engine: &dyn CopyEngine) -> crate::Result<T>
    where
        T: crate::NumCast,
    {
        let scalar = self.item(engine)?;
        scalar
            .to::<T>()
            .ok_or_else(|| Error::cast(std::any::type_name::<T>(), scalar.dtype()))
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.device == other.device
            && self.shape == other.shape
            && (Arc::ptr_eq(&self.storage, &other.storage) || self.storage == other.storage)
    }
}

#[cfg(test)]
mod test {
    use crate::{Device, DeviceCopyEngine, Error, Scalar, Tensor, TensorType};

    #[test]
    fn test_new() {
        let t = Tensor::from_vec(vec![1i32, 2, 3, 4, 5, 6], [2, 3]).unwrap();
        assert_eq!(t.dtype(), TensorType::Int32);
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.strides(), &[3, 1]);
        assert_eq!(t.numel(), 6);
        assert_eq!(t.device(), Device::Cpu);

        let err = Tensor::from_vec(vec![1.0f32, 2.0], [3]).unwrap_err();
        assert!(matches!(
            err,
            Error::ElementCount {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_scalar() {
        let t = Tensor::scalar(7u8);
        assert_eq!(t.ndim(), 0);
        assert_eq!(t.numel(), 1);
        assert_eq!(t.to_vec::<u8>().unwrap(), vec![7]);
        assert!(t.data::<i8>().is_err());
    }

    #[test]
    fn test_empty_like() {
        let t = Tensor::from_vec(vec![1.5f64, 2.5], [2, 1]).unwrap();
        let e = Tensor::empty_like(&t, Device::Mps(0));
        assert_eq!(e.shape(), t.shape());
        assert_eq!(e.dtype(), TensorType::Float64);
        assert_eq!(e.device(), Device::Mps(0));
        assert!(matches!(e.data::<f64>(), Err(Error::HostAccess(Device::Mps(0)))));
    }

    #[test]
    fn test_item() {
        let engine = DeviceCopyEngine::new([Device::Mps(0)]);
        let t = Tensor::scalar(-4i64);
        assert_eq!(t.item(&engine).unwrap(), Scalar::Int64(-4));
        assert_eq!(t.item_as::<f32>(&engine).unwrap(), -4.0);
        assert_eq!(engine.transfers(), 0);

        let t = Tensor::from_vec(vec![1u16, 2], [2]).unwrap();
        assert!(matches!(t.item(&engine), Err(Error::NotScalar(2))));

        let t = Tensor::scalar(-4i64).to(Device::Mps(0), &engine).unwrap();
        assert_eq!(t.item(&engine).unwrap(), Scalar::Int64(-4));
        assert!(matches!(
            t.item_as::<u32>(&engine),
            Err(Error::Cast {
                from: TensorType::Int64,
                ..
            })
        ));
    }

    #[test]
    fn test_eq() {
        let a = Tensor::from_vec(vec![true, false], [2]).unwrap();
        let b = Tensor::from_vec(vec![true, false], [2]).unwrap();
        let c = Tensor::from_vec(vec![true, false], [1, 2]).unwrap();
        assert_eq!(a, b);
        assert!(!a.shares_storage(&b));
        assert_ne!(a, c);
        assert!(a.shares_storage(&a.clone()));
    }
}
