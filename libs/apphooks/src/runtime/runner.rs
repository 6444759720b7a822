//! Bootstrap runner.
//!
//! Phase order: **resolve → configure (in resolved order)**.
//! - Nothing is configured unless the whole list resolves.
//! - The first failing module stops the sequence; later modules never run.

use std::sync::Arc;

use thiserror::Error;

use crate::context::{ConfigProvider, ModuleCtx};
use crate::contracts::ApplicationModule;
use crate::key::ModuleKey;
use crate::resolver::{DependencyResolver, ResolveError};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("module dependency resolution failed")]
    Resolve(#[from] ResolveError),
    #[error("configuration failed for module '{module}'")]
    Configure {
        module: ModuleKey,
        #[source]
        source: anyhow::Error,
    },
}

/// Resolves `modules` and configures each one in dependency order.
///
/// Returns the keys of the configured modules, in the order they ran.
pub fn configure_modules(
    modules: Vec<Arc<dyn ApplicationModule>>,
    config: Arc<dyn ConfigProvider>,
) -> Result<Vec<ModuleKey>, BootstrapError> {
    if modules.is_empty() {
        tracing::debug!("No application modules to configure");
        return Ok(Vec::new());
    }

    let sorted = DependencyResolver::new(&modules).resolve().map_err(|e| {
        tracing::error!(error = %e, "Failed to resolve application modules");
        BootstrapError::from(e)
    })?;

    let mut configured = Vec::with_capacity(sorted.len());
    for module in sorted {
        let key = module.key();
        let span = tracing::info_span!("module_configure", module = %key);
        let _guard = span.enter();

        let ctx = ModuleCtx::new(key.clone(), config.clone());
        if let Err(source) = module.configure(&ctx) {
            tracing::error!(
                error = %format!("{source:#}"),
                configured = configured.len(),
                "Module configuration failed; aborting bootstrap"
            );
            return Err(BootstrapError::Configure {
                module: key,
                source,
            });
        }

        tracing::debug!("Module configured");
        configured.push(key);
    }

    tracing::info!(
        modules = ?configured.iter().map(ModuleKey::as_str).collect::<Vec<_>>(),
        "Application modules configured"
    );
    Ok(configured)
}
