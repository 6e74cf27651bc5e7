//! Stable C ABI over the global [`Runtime`].
//!
//! Every entry point returns [`TETHER_SUCCESS`] or [`TETHER_FAILURE`] and
//! writes results through caller-provided out-pointers. Errors and panics
//! never cross the boundary; they are logged and reported as a failure code.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tether_tensor::NumCast;

use crate::{Error, Runtime, TensorHandle};

pub type TetherError = i32;

pub const TETHER_SUCCESS: TetherError = 0;
pub const TETHER_FAILURE: TetherError = 1;

fn convert_error<F>(name: &'static str, f: F) -> TetherError
where
    F: FnOnce() -> crate::Result<()>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => TETHER_SUCCESS,
        Ok(Err(error)) => {
            tracing::error!(%error, function = name, "tether ABI call failed");
            TETHER_FAILURE
        }
        Err(_) => {
            tracing::error!(function = name, "tether ABI call panicked");
            TETHER_FAILURE
        }
    }
}

/// # Safety
/// `out` must be null or valid for writes of `T`.
unsafe fn write_out<T>(out: *mut T, value: T) -> crate::Result<()> {
    if out.is_null() {
        return Err(Error::NullPointer);
    }
    out.write(value);
    Ok(())
}

/// # Safety
/// `out` must be null or valid for writes of `T`.
unsafe fn item_as<T: NumCast>(handle: TensorHandle, out: *mut T) -> crate::Result<()> {
    if out.is_null() {
        return Err(Error::NullPointer);
    }
    let runtime = Runtime::global();
    let value = runtime
        .registry()
        .tensor_ref(handle)?
        .item_as::<T>(runtime.engine())?;
    write_out(out, value)
}

/// Frees `handle` and the tensor it owns.
#[no_mangle]
pub extern "C" fn tether_delete_tensor_object(handle: TensorHandle) -> TetherError {
    convert_error("tether_delete_tensor_object", || {
        Runtime::global().registry().delete_handle(handle)
    })
}

/// Writes a new handle aliasing the storage of `handle` to `out`.
///
/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tether_clone_tensor_handle(
    handle: TensorHandle,
    out: *mut TensorHandle,
) -> TetherError {
    convert_error("tether_clone_tensor_handle", || {
        if out.is_null() {
            return Err(Error::NullPointer);
        }
        let cloned = Runtime::global().registry().clone_handle(handle)?;
        write_out(out, cloned)
    })
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tether_get_dtype(handle: TensorHandle, out: *mut u8) -> TetherError {
    convert_error("tether_get_dtype", || {
        let tensor = Runtime::global().registry().tensor_ref(handle)?;
        write_out(out, tensor.dtype().code())
    })
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tether_get_dim(handle: TensorHandle, out: *mut i64) -> TetherError {
    convert_error("tether_get_dim", || {
        let tensor = Runtime::global().registry().tensor_ref(handle)?;
        write_out(out, tensor.ndim() as i64)
    })
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tether_get_numel(handle: TensorHandle, out: *mut i64) -> TetherError {
    convert_error("tether_get_numel", || {
        let tensor = Runtime::global().registry().tensor_ref(handle)?;
        write_out(out, tensor.numel() as i64)
    })
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tether_get_device_type(
    handle: TensorHandle,
    out: *mut i32,
) -> TetherError {
    convert_error("tether_get_device_type", || {
        let tensor = Runtime::global().registry().tensor_ref(handle)?;
        write_out(out, tensor.device().type_code())
    })
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tether_item_float32(handle: TensorHandle, out: *mut f32) -> TetherError {
    convert_error("tether_item_float32", || item_as(handle, out))
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tether_item_float64(handle: TensorHandle, out: *mut f64) -> TetherError {
    convert_error("tether_item_float64", || item_as(handle, out))
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tether_item_int64(handle: TensorHandle, out: *mut i64) -> TetherError {
    convert_error("tether_item_int64", || item_as(handle, out))
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tether_item_bool(handle: TensorHandle, out: *mut bool) -> TetherError {
    convert_error("tether_item_bool", || {
        if out.is_null() {
            return Err(Error::NullPointer);
        }
        let value = Runtime::global().item(handle)?.to_bool();
        write_out(out, value)
    })
}

#[cfg(test)]
mod test {
    use std::ptr;

    use tether_tensor::{Device, Tensor, TensorType};

    use super::*;

    fn register(tensor: Tensor) -> TensorHandle {
        Runtime::global().registry().new_handle(tensor).unwrap()
    }

    #[test]
    fn test_metadata() {
        let h = register(Tensor::from_vec(vec![1i32, 2, 3, 4, 5, 6], [2, 3]).unwrap());
        let (mut dtype, mut dim, mut numel, mut device) = (0u8, 0i64, 0i64, -1i32);
        unsafe {
            assert_eq!(tether_get_dtype(h, &mut dtype), TETHER_SUCCESS);
            assert_eq!(tether_get_dim(h, &mut dim), TETHER_SUCCESS);
            assert_eq!(tether_get_numel(h, &mut numel), TETHER_SUCCESS);
            assert_eq!(tether_get_device_type(h, &mut device), TETHER_SUCCESS);
        }
        assert_eq!(TensorType::from_code(dtype).unwrap(), TensorType::Int32);
        assert_eq!(dim, 2);
        assert_eq!(numel, 6);
        assert_eq!(device, Device::Cpu.type_code());
        assert_eq!(tether_delete_tensor_object(h), TETHER_SUCCESS);
    }

    #[test]
    fn test_item() {
        let runtime = Runtime::global();
        let on_device = Tensor::scalar(3.14f32)
            .to(Device::Mps(0), runtime.engine())
            .unwrap();
        let h = register(on_device);
        let (mut f, mut d, mut b) = (0f32, 0f64, false);
        unsafe {
            assert_eq!(tether_item_float32(h, &mut f), TETHER_SUCCESS);
            assert_eq!(tether_item_float64(h, &mut d), TETHER_SUCCESS);
            assert_eq!(tether_item_bool(h, &mut b), TETHER_SUCCESS);
        }
        assert_eq!(f, 3.14);
        assert_eq!(d, 3.14f32 as f64);
        assert!(b);

        let mut i = 0i64;
        unsafe {
            // 3.14 is not an integer value but casts by truncation.
            assert_eq!(tether_item_int64(h, &mut i), TETHER_SUCCESS);
        }
        assert_eq!(i, 3);

        let q = register(Tensor::from_raw_bytes(TensorType::QUInt8, vec![1], [1]).unwrap());
        unsafe {
            assert_eq!(tether_item_float32(q, &mut f), TETHER_FAILURE);
        }
    }

    #[test]
    fn test_clone_and_delete() {
        let h = register(Tensor::scalar(1u8));
        let mut c = TensorHandle::NULL;
        unsafe {
            assert_eq!(tether_clone_tensor_handle(h, &mut c), TETHER_SUCCESS);
        }
        assert!(!c.is_null());
        assert_ne!(c, h);
        assert_eq!(tether_delete_tensor_object(h), TETHER_SUCCESS);
        assert_eq!(tether_delete_tensor_object(h), TETHER_FAILURE);
        assert_eq!(tether_delete_tensor_object(c), TETHER_SUCCESS);
        assert_eq!(tether_delete_tensor_object(TensorHandle::NULL), TETHER_FAILURE);
    }

    #[test]
    fn test_null_out_pointer() {
        let h = register(Tensor::scalar(1i64));
        unsafe {
            assert_eq!(tether_get_dtype(h, ptr::null_mut()), TETHER_FAILURE);
            assert_eq!(tether_item_int64(h, ptr::null_mut()), TETHER_FAILURE);
            assert_eq!(tether_clone_tensor_handle(h, ptr::null_mut()), TETHER_FAILURE);
        }
        // The failed clone must not leak a handle.
        assert_eq!(tether_delete_tensor_object(h), TETHER_SUCCESS);
    }
}
