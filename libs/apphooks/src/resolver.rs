use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use thiserror::Error;

use crate::contracts::ApplicationModule;
use crate::key::ModuleKey;

/// Why no configuration order exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("dependency '{missing}' required by '{dependent}' is not registered")]
    MissingDependency {
        dependent: ModuleKey,
        missing: ModuleKey,
    },
    #[error("cyclic dependency detected between modules: [{}]", join_keys(.keys))]
    CyclicDependency { keys: Vec<ModuleKey> },
}

fn join_keys(keys: &[ModuleKey]) -> String {
    keys.iter()
        .map(ModuleKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Orders one snapshot of modules so that every module comes after all of
/// its dependencies.
///
/// Nodes are indexed in first-seen input order; that order decides ties, so
/// the output is fully determined by the input sequence. A key supplied more
/// than once keeps its first position and its last module.
pub struct DependencyResolver {
    names: Vec<ModuleKey>,
    modules: Vec<Arc<dyn ApplicationModule>>,
    idx: HashMap<ModuleKey, usize>,
}

impl std::fmt::Debug for DependencyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyResolver")
            .field("modules", &self.names)
            .finish()
    }
}

impl DependencyResolver {
    pub fn new(modules: &[Arc<dyn ApplicationModule>]) -> Self {
        let mut names = Vec::with_capacity(modules.len());
        let mut slots: Vec<Arc<dyn ApplicationModule>> = Vec::with_capacity(modules.len());
        let mut idx = HashMap::with_capacity(modules.len());

        for module in modules {
            let key = module.key();
            match idx.get(&key) {
                Some(&i) => slots[i] = module.clone(),
                None => {
                    idx.insert(key.clone(), names.len());
                    names.push(key);
                    slots.push(module.clone());
                }
            }
        }

        Self {
            names,
            modules: slots,
            idx,
        }
    }

    /// Number of distinct modules in the snapshot.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Kahn's algorithm over the snapshot. Does not mutate the resolver, so
    /// calling it again yields the same answer.
    pub fn resolve(&self) -> Result<Vec<Arc<dyn ApplicationModule>>, ResolveError> {
        let order = self.sorted_indices()?;

        tracing::debug!(
            modules = ?order.iter().map(|&i| self.names[i].as_str()).collect::<Vec<_>>(),
            "Module dependency order resolved"
        );

        Ok(order.into_iter().map(|i| self.modules[i].clone()).collect())
    }

    /// Same as [`resolve`](Self::resolve) but yields only the keys.
    pub fn resolve_keys(&self) -> Result<Vec<ModuleKey>, ResolveError> {
        Ok(self
            .sorted_indices()?
            .into_iter()
            .map(|i| self.names[i].clone())
            .collect())
    }

    fn sorted_indices(&self) -> Result<Vec<usize>, ResolveError> {
        let n = self.names.len();
        let mut adj = vec![Vec::<usize>::new(); n];
        let mut indeg = vec![0usize; n];

        // 1) edges dep -> module, failing on the first unknown dependency
        for (u, module) in self.modules.iter().enumerate() {
            for dep in module.dependencies() {
                let v = *self
                    .idx
                    .get(&dep)
                    .ok_or_else(|| ResolveError::MissingDependency {
                        dependent: self.names[u].clone(),
                        missing: dep.clone(),
                    })?;
                adj[v].push(u);
                indeg[u] += 1;
            }
        }

        // 2) seed with every module that owes nothing, in input order
        let mut q: VecDeque<usize> = (0..n).filter(|&i| indeg[i] == 0).collect();

        let mut order = Vec::with_capacity(n);
        while let Some(u) = q.pop_front() {
            order.push(u);
            for &w in &adj[u] {
                indeg[w] -= 1;
                if indeg[w] == 0 {
                    q.push_back(w);
                }
            }
        }

        // 3) anything still owing a dependency sits on or behind a cycle
        if order.len() < n {
            let keys = (0..n)
                .filter(|&i| indeg[i] > 0)
                .map(|i| self.names[i].clone())
                .collect();
            return Err(ResolveError::CyclicDependency { keys });
        }

        Ok(order)
    }
}
