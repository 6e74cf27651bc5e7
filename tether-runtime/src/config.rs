use tether_common::Device;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    engine_config: EngineConfig,
    registry_config: RegistryConfig,
}

impl TetherConfig {
    pub fn builder() -> TetherConfigBuilder {
        TetherConfigBuilder::default()
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    pub fn registry_config(&self) -> &RegistryConfig {
        &self.registry_config
    }

    pub fn into_builder(self) -> TetherConfigBuilder {
        TetherConfigBuilder(self)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, derive_more::Into)]
pub struct TetherConfigBuilder(TetherConfig);

impl TetherConfigBuilder {
    pub fn engine_config(mut self, config: impl Into<EngineConfig>) -> Self {
        self.0.engine_config = config.into();
        self
    }

    pub fn registry_config(mut self, config: impl Into<RegistryConfig>) -> Self {
        self.0.registry_config = config.into();
        self
    }

    pub fn build(self) -> TetherConfig {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    devices: Vec<Device>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            devices: vec![Device::Mps(0)],
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Accelerators attached to the copy engine.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn into_builder(self) -> EngineConfigBuilder {
        EngineConfigBuilder(self)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, derive_more::Into)]
pub struct EngineConfigBuilder(EngineConfig);

impl EngineConfigBuilder {
    pub fn devices<I>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = Device>,
    {
        self.0.devices = devices.into_iter().collect();
        self
    }

    pub fn build(self) -> EngineConfig {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    capacity: Option<usize>,
}

impl RegistryConfig {
    pub fn builder() -> RegistryConfigBuilder {
        RegistryConfigBuilder::default()
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of live handles, or `None` for no limit.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn into_builder(self) -> RegistryConfigBuilder {
        RegistryConfigBuilder(self)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, derive_more::Into)]
pub struct RegistryConfigBuilder(RegistryConfig);

impl RegistryConfigBuilder {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.0.capacity = Some(capacity);
        self
    }

    pub fn build(self) -> RegistryConfig {
        self.0
    }
}
