use crate::context::ModuleCtx;
use crate::key::ModuleKey;

/// A unit of application setup.
///
/// Modules name the modules that must be configured before them; the runtime
/// orders them and calls [`configure`](ApplicationModule::configure) exactly
/// once per bootstrap.
pub trait ApplicationModule: Send + Sync + 'static {
    /// Identity used for ordering and dependency references.
    fn key(&self) -> ModuleKey {
        ModuleKey::of::<Self>()
    }

    /// Keys of the modules that must be configured before this one.
    fn dependencies(&self) -> Vec<ModuleKey> {
        Vec::new()
    }

    /// Performs the configuration work. Runs after every dependency has
    /// been configured successfully.
    fn configure(&self, ctx: &ModuleCtx) -> anyhow::Result<()>;
}
