use std::sync::Arc;

use once_cell::sync::OnceCell;
use tether_tensor::{CopyEngine, DeviceCopyEngine, Scalar};

use crate::{HandleRegistry, TensorHandle, TetherConfig};

static GLOBAL: OnceCell<Runtime> = OnceCell::new();

/// A handle registry paired with the copy engine used to read tensors back to the host.
#[derive(Debug)]
pub struct Runtime {
    config: TetherConfig,
    registry: HandleRegistry,
    engine: Arc<dyn CopyEngine>,
}

impl Runtime {
    pub fn new(config: TetherConfig) -> Self {
        let engine = Arc::new(DeviceCopyEngine::new(
            config.engine_config().devices().iter().copied(),
        ));
        Self::with_engine(config, engine)
    }

    pub fn with_engine(config: TetherConfig, engine: Arc<dyn CopyEngine>) -> Self {
        tracing::debug!(?config, "creating tether runtime");
        Self {
            registry: HandleRegistry::new(config.registry_config()),
            engine,
            config,
        }
    }

    pub fn config(&self) -> &TetherConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &dyn CopyEngine {
        self.engine.as_ref()
    }

    pub fn item(&self, handle: TensorHandle) -> crate::Result<Scalar> {
        self.registry.item(handle, self.engine())
    }

    /// Installs the process-wide runtime used by the C ABI.
    ///
    /// Fails if the global runtime was already initialized, either by an
    /// earlier call or implicitly by [`Runtime::global`].
    pub fn init_global(config: TetherConfig) -> crate::Result<&'static Runtime> {
        let mut installed = false;
        let runtime = GLOBAL.get_or_init(|| {
            installed = true;
            Runtime::new(config)
        });
        if installed {
            Ok(runtime)
        } else {
            Err(crate::Error::AlreadyInitialized)
        }
    }

    /// The process-wide runtime, created with the default config on first use.
    pub fn global() -> &'static Runtime {
        GLOBAL.get_or_init(|| Runtime::new(TetherConfig::default()))
    }
}

#[cfg(test)]
mod test {
    use tether_tensor::{Device, Scalar, Tensor};

    use crate::{config::EngineConfig, Runtime, TetherConfig};

    #[test]
    fn test_runtime_item() {
        let runtime = Runtime::new(TetherConfig::default());
        let t = Tensor::scalar(9u16)
            .to(Device::Mps(0), runtime.engine())
            .unwrap();
        let h = runtime.registry().new_handle(t).unwrap();
        assert_eq!(runtime.item(h).unwrap(), Scalar::UInt16(9));
    }

    #[test]
    fn test_detached_device() {
        let config = TetherConfig::builder()
            .engine_config(EngineConfig::builder().devices([]))
            .build();
        let runtime = Runtime::new(config);
        assert!(Tensor::scalar(1i8)
            .to(Device::Mps(0), runtime.engine())
            .is_err());
    }
}
