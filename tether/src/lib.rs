//! Boundary adapters for accelerator tensor runtimes.
//!
//! - [`extract_scalar`] reads the single element of a device tensor back to the host.
//! - [`HandleRegistry`] converts tensors to and from opaque, ABI-stable
//!   [`TensorHandle`]s, one at a time or in bulk.
//!
//! ```
//! use tether::{Device, HandleRegistry, Runtime, Scalar, Tensor, TetherConfig};
//!
//! # fn main() -> tether::Result<()> {
//! let runtime = Runtime::new(TetherConfig::default());
//! let t = Tensor::scalar(3.14f32).to(Device::Mps(0), runtime.engine())?;
//! assert_eq!(tether::extract_scalar(&t, runtime.engine())?, Scalar::Float32(3.14));
//!
//! let registry = HandleRegistry::default();
//! let mut handles = registry.alloc_handles_from_tensors([t.clone()])?;
//! let tensors = registry.steal_tensors_from_handles(&mut handles)?;
//! assert_eq!(tensors, vec![t]);
//! assert!(handles[0].is_null());
//! # Ok(())
//! # }
//! ```

use tracing::metadata::LevelFilter;
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

pub use tether_common as common;
pub use tether_common::{
    bf16, dispatch_scalar_types, f16, Complex, CopyError, Device, Error, Result, Scalar, Shape,
    Storage, TensorType, TensorValue,
};
pub use tether_runtime::{
    abi, config, HandleRegistry, Runtime, TensorHandle, TensorRef, TetherConfig,
};
pub use tether_tensor::{extract_scalar, CopyEngine, DeviceCopyEngine, Tensor};

/// Installs a global `tracing` subscriber filtered by `TETHER_LOG`, falling back to `level`.
///
/// Does nothing if a subscriber is already installed.
pub fn init_logging(level: LevelFilter) {
    let res = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().with_filter(
                EnvFilter::builder()
                    .with_default_directive(level.into())
                    .with_env_var("TETHER_LOG")
                    .from_env_lossy(),
            ),
        )
        .try_init();
    if let Err(error) = res {
        tracing::debug!(%error, "tether logging already initialized");
    }
}
