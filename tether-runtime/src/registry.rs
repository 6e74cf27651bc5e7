use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc, PoisonError, RwLock,
    },
};

use dashmap::DashMap;
use tether_tensor::{CopyEngine, Scalar, Tensor};

use crate::{config::RegistryConfig, Error, TensorHandle, TensorRef};

/// Maps opaque [`TensorHandle`] tokens to the tensors they own.
///
/// Every live handle owns exactly one registered tensor until it is stolen
/// back or deleted. Misuse (null, stale or duplicated handles) is reported as
/// an error instead of being trusted.
#[derive(Debug)]
pub struct HandleRegistry {
    tensors: DashMap<u64, Arc<Tensor>>,
    // Held exclusively by bulk steals so no lookup observes a partial steal.
    gate: RwLock<()>,
    next: AtomicU64,
    live: AtomicUsize,
    capacity: Option<usize>,
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}

impl HandleRegistry {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            tensors: DashMap::new(),
            gate: RwLock::new(()),
            next: AtomicU64::new(1),
            live: AtomicUsize::new(0),
            capacity: config.capacity(),
        }
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn contains(&self, handle: TensorHandle) -> bool {
        self.tensors.contains_key(&handle.into_raw())
    }

    /// Registers `tensor` and returns the handle that now owns it.
    pub fn new_handle(&self, tensor: Tensor) -> crate::Result<TensorHandle> {
        self.reserve(1)?;
        Ok(self.insert(Arc::new(tensor)))
    }

    /// Moves every tensor into the registry and returns one handle per tensor, in order.
    ///
    /// Either all tensors are registered or, if the registry would exceed its
    /// capacity, none are.
    pub fn alloc_handles_from_tensors<I>(&self, tensors: I) -> crate::Result<Vec<TensorHandle>>
    where
        I: IntoIterator<Item = Tensor>,
    {
        let tensors = tensors.into_iter().collect::<Vec<_>>();
        self.reserve(tensors.len())?;
        Ok(self.insert_all(tensors))
    }

    /// Like [`alloc_handles_from_tensors`](Self::alloc_handles_from_tensors), taking
    /// each tensor out of its slot and leaving `None` behind.
    ///
    /// Fails without touching any slot if a slot is already empty or the
    /// registry would exceed its capacity.
    pub fn alloc_handles_from_slots(
        &self,
        slots: &mut [Option<Tensor>],
    ) -> crate::Result<Vec<TensorHandle>> {
        let filled = slots.iter().filter(|s| s.is_some()).count();
        if filled != slots.len() {
            return Err(Error::element_count(slots.len(), filled));
        }
        self.reserve(filled)?;
        Ok(self.insert_all(slots.iter_mut().filter_map(Option::take)))
    }

    /// Borrows the tensor owned by `handle` without taking ownership.
    pub fn tensor_ref(&self, handle: TensorHandle) -> crate::Result<TensorRef> {
        self.check(handle)?;
        let _gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        self.tensors
            .get(&handle.into_raw())
            .map(|t| TensorRef::new(handle, t.value().clone()))
            .ok_or_else(|| self.stale(handle))
    }

    /// Returns the handle that `tensor` was borrowed through.
    pub fn handle_of(&self, tensor: &TensorRef) -> TensorHandle {
        tensor.handle()
    }

    /// Registers a second handle owning a tensor that shares storage with `handle`'s.
    pub fn clone_handle(&self, handle: TensorHandle) -> crate::Result<TensorHandle> {
        let tensor = Tensor::clone(&*self.tensor_ref(handle)?);
        self.new_handle(tensor)
    }

    /// Takes the tensor owned by `handle` out of the registry.
    pub fn take(&self, handle: TensorHandle) -> crate::Result<Tensor> {
        self.check(handle)?;
        let _gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let (_, tensor) = self
            .tensors
            .remove(&handle.into_raw())
            .ok_or_else(|| self.stale(handle))?;
        self.release(1);
        Ok(unwrap_tensor(tensor))
    }

    /// Frees `handle` and drops the tensor it owns.
    pub fn delete_handle(&self, handle: TensorHandle) -> crate::Result<()> {
        self.take(handle).map(drop)
    }

    /// Moves the tensors owned by `handles` out of the registry, in order, and
    /// nulls every slot.
    ///
    /// All handles are validated first. If any is null, stale or repeated,
    /// nothing is taken and no slot is modified. Concurrent lookups see either
    /// every tensor or none of them.
    pub fn steal_tensors_from_handles(
        &self,
        handles: &mut [TensorHandle],
    ) -> crate::Result<Vec<Tensor>> {
        let _gate = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        let mut seen = HashSet::with_capacity(handles.len());
        for handle in handles.iter() {
            self.check(*handle)?;
            if !seen.insert(*handle) || !self.contains(*handle) {
                return Err(self.stale(*handle));
            }
        }

        // Removals cannot miss: every other removal path holds the gate.
        let taken = handles
            .iter()
            .filter_map(|h| self.tensors.remove(&h.into_raw()))
            .map(|(_, tensor)| unwrap_tensor(tensor))
            .collect::<Vec<_>>();
        self.release(taken.len());
        for handle in handles.iter_mut() {
            handle.take();
        }
        tracing::debug!(count = taken.len(), "stole tensors from handles");
        Ok(taken)
    }

    /// Reads the single element of the tensor owned by `handle`.
    pub fn item(&self, handle: TensorHandle, engine: &dyn CopyEngine) -> crate::Result<Scalar> {
        self.tensor_ref(handle)?.item(engine)
    }

    fn insert_all<I>(&self, tensors: I) -> Vec<TensorHandle>
    where
        I: IntoIterator<Item = Tensor>,
    {
        let handles = tensors
            .into_iter()
            .map(|t| self.insert(Arc::new(t)))
            .collect::<Vec<_>>();
        tracing::debug!(count = handles.len(), "allocated tensor handles");
        handles
    }

    fn insert(&self, tensor: Arc<Tensor>) -> TensorHandle {
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        self.tensors.insert(raw, tensor);
        TensorHandle::from_raw(raw)
    }

    fn reserve(&self, n: usize) -> crate::Result<()> {
        let Some(capacity) = self.capacity else {
            self.live.fetch_add(n, Ordering::AcqRel);
            return Ok(());
        };
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                live.checked_add(n).filter(|total| *total <= capacity)
            })
            .map(|_| ())
            .map_err(|_| {
                tracing::warn!(capacity, requested = n, "handle registry is full");
                Error::HandleLimit(capacity)
            })
    }

    fn release(&self, n: usize) {
        self.live.fetch_sub(n, Ordering::AcqRel);
    }

    fn check(&self, handle: TensorHandle) -> crate::Result<()> {
        if handle.is_null() {
            tracing::warn!("rejected null tensor handle");
            Err(Error::NullHandle)
        } else {
            Ok(())
        }
    }

    fn stale(&self, handle: TensorHandle) -> Error {
        tracing::warn!(%handle, "rejected stale tensor handle");
        Error::InvalidHandle(handle.into_raw())
    }
}

fn unwrap_tensor(tensor: Arc<Tensor>) -> Tensor {
    Arc::try_unwrap(tensor).unwrap_or_else(|shared| Tensor::clone(&shared))
}
