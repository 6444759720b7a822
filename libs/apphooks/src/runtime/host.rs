use std::sync::Arc;

use crate::builder::ModuleListBuilder;
use crate::context::{ConfigProvider, EmptyConfigProvider};
use crate::contracts::ApplicationModule;
use crate::key::ModuleKey;
use crate::resolver::{DependencyResolver, ResolveError};
use crate::runtime::runner::{configure_modules, BootstrapError};

/// A module list bound to the configuration it will be configured with.
pub struct ModuleHost {
    modules: Vec<Arc<dyn ApplicationModule>>,
    config: Arc<dyn ConfigProvider>,
}

impl std::fmt::Debug for ModuleHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self.modules.iter().map(|m| m.key().to_string()).collect();
        f.debug_struct("ModuleHost").field("modules", &keys).finish()
    }
}

impl ModuleHost {
    pub fn new(modules: ModuleListBuilder, config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            modules: modules.build(),
            config,
        }
    }

    /// Host whose modules all see an empty configuration.
    pub fn without_config(modules: ModuleListBuilder) -> Self {
        Self::new(modules, Arc::new(EmptyConfigProvider))
    }

    pub fn modules(&self) -> &[Arc<dyn ApplicationModule>] {
        &self.modules
    }

    /// Dry run: the order modules would be configured in.
    pub fn resolve_order(&self) -> Result<Vec<ModuleKey>, ResolveError> {
        DependencyResolver::new(&self.modules).resolve_keys()
    }

    pub fn configure(self) -> Result<Vec<ModuleKey>, BootstrapError> {
        configure_modules(self.modules, self.config)
    }
}
