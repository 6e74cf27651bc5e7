use std::{fmt::Display, ops::Deref, sync::Arc};

use tether_tensor::Tensor;

/// Opaque, ABI-stable token standing for ownership of a registered tensor.
///
/// Tokens are plain integers: they carry no address and are never reused by a
/// registry, so a stale token is detected instead of aliasing a newer tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TensorHandle(u64);

impl TensorHandle {
    pub const NULL: Self = Self(0);

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn into_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Replaces `self` with [`TensorHandle::NULL`] and returns the previous value.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl Display for TensorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Non-owning view of a registered tensor.
///
/// The view stays valid even if the handle is later stolen or deleted; it
/// keeps the tensor it was created from alive.
#[derive(Debug, Clone)]
pub struct TensorRef {
    handle: TensorHandle,
    tensor: Arc<Tensor>,
}

impl TensorRef {
    pub(crate) fn new(handle: TensorHandle, tensor: Arc<Tensor>) -> Self {
        Self { handle, tensor }
    }

    #[inline]
    pub fn handle(&self) -> TensorHandle {
        self.handle
    }

    /// Whether both views refer to the same registered tensor object.
    #[inline]
    pub fn ptr_eq(&self, other: &TensorRef) -> bool {
        Arc::ptr_eq(&self.tensor, &other.tensor)
    }
}

impl Deref for TensorRef {
    type Target = Tensor;

    fn deref(&self) -> &Self::Target {
        &self.tensor
    }
}

impl AsRef<Tensor> for TensorRef {
    fn as_ref(&self) -> &Tensor {
        &self.tensor
    }
}
