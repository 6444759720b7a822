//! # AppHooks - Ordered Application Modules
//!
//! Application setup split into small modules, each declaring the modules it
//! needs configured first. The runtime resolves a safe order (Kahn's
//! topological sort) and refuses to run anything when a dependency is missing
//! or the graph has a cycle.
//!
//! ## Basic Module Example
//!
//! ```rust,ignore
//! use apphooks::{ApplicationModule, ModuleCtx, ModuleKey, ModuleListBuilder};
//!
//! struct Analytics;
//! impl ApplicationModule for Analytics {
//!     fn configure(&self, _ctx: &ModuleCtx) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! struct Feature;
//! impl ApplicationModule for Feature {
//!     fn dependencies(&self) -> Vec<ModuleKey> {
//!         vec![ModuleKey::of::<Analytics>()]
//!     }
//!     fn configure(&self, _ctx: &ModuleCtx) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let modules = ModuleListBuilder::new().module(Feature).module(Analytics).build();
//! let configured = apphooks::configure_modules(modules, provider)?;
//! ```

pub use anyhow::Result;

// Module system exports
pub mod context;
pub use context::{ConfigError, ConfigProvider, EmptyConfigProvider, ModuleCtx};

pub mod contracts;
pub use contracts::ApplicationModule;

pub mod key;
pub use key::ModuleKey;

pub mod builder;
pub use builder::ModuleListBuilder;

pub mod resolver;
pub use resolver::{DependencyResolver, ResolveError};

pub mod runtime;
pub use runtime::{configure_modules, BootstrapError, ModuleHost};
