use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::key::ModuleKey;

/// Source of per-module configuration sections (raw JSON by module name).
pub trait ConfigProvider: Send + Sync {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// Provider with no sections at all; every module sees its defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyConfigProvider;

impl ConfigProvider for EmptyConfigProvider {
    fn get_module_config(&self, _module_name: &str) -> Option<&serde_json::Value> {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config for module '{module}'")]
    InvalidModuleConfig {
        module: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything a module sees while it is being configured.
#[derive(Clone)]
pub struct ModuleCtx {
    key: ModuleKey,
    config: Arc<dyn ConfigProvider>,
}

impl std::fmt::Debug for ModuleCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleCtx")
            .field("key", &self.key)
            .field(
                "has_config",
                &self.config.get_module_config(self.key.as_str()).is_some(),
            )
            .finish()
    }
}

impl ModuleCtx {
    pub fn new(key: ModuleKey, config: Arc<dyn ConfigProvider>) -> Self {
        Self { key, config }
    }

    pub fn key(&self) -> &ModuleKey {
        &self.key
    }

    /// Raw config section of the module being configured.
    pub fn raw_config(&self) -> Option<&serde_json::Value> {
        self.config.get_module_config(self.key.as_str())
    }

    /// Typed config section of the module being configured.
    ///
    /// A missing section yields `T::default()`; a section that does not
    /// match `T` is an error.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> Result<T, ConfigError> {
        match self.raw_config() {
            None => Ok(T::default()),
            Some(raw) => {
                serde_json::from_value(raw.clone()).map_err(|source| {
                    ConfigError::InvalidModuleConfig {
                        module: self.key.to_string(),
                        source,
                    }
                })
            }
        }
    }

    /// Provider shared by all modules of this bootstrap.
    pub fn config_provider(&self) -> &Arc<dyn ConfigProvider> {
        &self.config
    }
}
