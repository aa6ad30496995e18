use crate::{
    Vault,
    config::{ConfigError, VaultConfig},
    runtime::RuntimeHandle,
    storage::{InMemoryStorage, Storage},
};

pub struct VaultBuilder<S, R> {
    pub(crate) storage: S,
    pub(crate) runtime: R,
    pub(crate) config: VaultConfig,
}

impl<S, R> VaultBuilder<S, R> {
    pub fn with_storage<S2: Storage>(self, storage: S2) -> VaultBuilder<S2, R> {
        VaultBuilder {
            storage,
            runtime: self.runtime,
            config: self.config,
        }
    }

    /// Storage already set is kept, including the clock it expires entries by
    pub fn with_runtime<R2: RuntimeHandle>(self, runtime: R2) -> VaultBuilder<S, R2> {
        VaultBuilder {
            runtime,
            storage: self.storage,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: VaultConfig) -> Self {
        self.config = config;
        self
    }
}

impl<R: RuntimeHandle> VaultBuilder<InMemoryStorage, R> {
    /// A builder with in-memory storage that expires entries by `runtime`'s clock
    pub fn new(runtime: R) -> VaultBuilder<InMemoryStorage, R> {
        VaultBuilder {
            storage: InMemoryStorage::with_clock(runtime.clone()),
            runtime,
            config: VaultConfig::default(),
        }
    }
}

impl<S: Storage, R: RuntimeHandle> VaultBuilder<S, R> {
    pub fn load(self) -> Result<Vault, ConfigError> {
        Vault::load(self)
    }
}
