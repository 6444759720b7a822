use std::collections::HashSet;
use std::sync::Arc;

use crate::contracts::ApplicationModule;

/// Assembles the ordered module list handed to the runtime.
///
/// The builder only collects; missing or cyclic dependencies surface when
/// the list is resolved.
#[derive(Default)]
pub struct ModuleListBuilder {
    modules: Vec<Arc<dyn ApplicationModule>>,
}

impl std::fmt::Debug for ModuleListBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self.modules.iter().map(|m| m.key().to_string()).collect();
        f.debug_struct("ModuleListBuilder")
            .field("modules", &keys)
            .finish()
    }
}

impl ModuleListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module<M: ApplicationModule>(self, module: M) -> Self {
        self.shared(Arc::new(module))
    }

    pub fn shared(mut self, module: Arc<dyn ApplicationModule>) -> Self {
        self.modules.push(module);
        self
    }

    /// Adds the module only when present.
    pub fn optional<M: ApplicationModule>(self, module: Option<M>) -> Self {
        match module {
            Some(m) => self.module(m),
            None => self,
        }
    }

    /// Applies `f` only when `cond` holds.
    pub fn when(self, cond: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if cond {
            f(self)
        } else {
            self
        }
    }

    /// Applies `first` when `cond` holds, `second` otherwise.
    pub fn either(
        self,
        cond: bool,
        first: impl FnOnce(Self) -> Self,
        second: impl FnOnce(Self) -> Self,
    ) -> Self {
        if cond {
            first(self)
        } else {
            second(self)
        }
    }

    pub fn extend<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ApplicationModule>>,
    {
        self.modules.extend(modules);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn build(self) -> Vec<Arc<dyn ApplicationModule>> {
        let mut seen = HashSet::with_capacity(self.modules.len());
        for module in &self.modules {
            let key = module.key();
            if !seen.insert(key.clone()) {
                tracing::warn!(module = %key, "Module registered more than once; last one wins");
            }
        }
        self.modules
    }
}
