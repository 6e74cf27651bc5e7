use tether::{Device, Error, HandleRegistry, Runtime, Scalar, Tensor, TensorType, TetherConfig};
use tracing::metadata::LevelFilter;

fn runtime() -> Runtime {
    tether::init_logging(LevelFilter::DEBUG);
    Runtime::new(TetherConfig::default())
}

#[test]
fn extract_float32_from_device() -> anyhow::Result<()> {
    let runtime = runtime();
    let t = Tensor::scalar(3.14f32).to(Device::Mps(0), runtime.engine())?;

    let s = tether::extract_scalar(&t, runtime.engine())?;
    assert_eq!(s, Scalar::Float32(3.14));
    assert_eq!(t.item_as::<f64>(runtime.engine())?, 3.14f32 as f64);
    Ok(())
}

#[test]
fn extract_rejects_storage_only_types() -> anyhow::Result<()> {
    let runtime = runtime();
    for dtype in [
        TensorType::Complex32,
        TensorType::QInt32,
        TensorType::Float8E5M2,
    ] {
        let bytes = vec![0; dtype.element_size()];
        let t = Tensor::from_raw_bytes(dtype, bytes, [1])?;
        let t = t.to(Device::Mps(0), runtime.engine())?;
        match tether::extract_scalar(&t, runtime.engine()) {
            Err(Error::Unsupported { dtype: actual, .. }) => assert_eq!(actual, dtype),
            other => panic!("expected unsupported type error, got {:?}", other),
        }
    }
    Ok(())
}

#[test]
fn wrap_unwrap_three_tensors() -> anyhow::Result<()> {
    let registry = HandleRegistry::default();
    let a = Tensor::from_vec(vec![1i64, 2, 3], [3])?;
    let b = Tensor::scalar(true);
    let c = Tensor::from_vec(vec![0.5f64; 4], [2, 2])?;

    let mut handles = registry.alloc_handles_from_tensors(vec![a.clone(), b.clone(), c.clone()])?;
    assert_eq!(handles.len(), 3);

    let tensors = registry.steal_tensors_from_handles(&mut handles)?;
    assert_eq!(tensors, vec![a, b, c]);
    assert!(handles.iter().all(|h| h.is_null()));
    assert!(matches!(
        registry.steal_tensors_from_handles(&mut handles),
        Err(Error::NullHandle)
    ));
    Ok(())
}

#[test]
fn item_through_handle() -> anyhow::Result<()> {
    let runtime = runtime();
    let t = Tensor::scalar(-12i8).to(Device::Mps(0), runtime.engine())?;
    let h = runtime.registry().new_handle(t)?;

    assert_eq!(runtime.item(h)?, Scalar::Int8(-12));
    let r = runtime.registry().tensor_ref(h)?;
    assert!(runtime.registry().tensor_ref(r.handle())?.ptr_eq(&r));

    runtime.registry().delete_handle(h)?;
    assert!(runtime.item(h).is_err());
    Ok(())
}
