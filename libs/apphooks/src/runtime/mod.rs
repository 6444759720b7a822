mod host;
mod runner;

pub use host::ModuleHost;
pub use runner::{configure_modules, BootstrapError};
