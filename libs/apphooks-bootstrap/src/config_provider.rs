use crate::config::AppConfig;
use std::sync::Arc;

/// `apphooks::ConfigProvider` backed by the loaded `AppConfig`.
pub struct AppConfigProvider(Arc<AppConfig>);

impl AppConfigProvider {
    pub fn new(config: AppConfig) -> Self {
        Self(Arc::new(config))
    }

    pub fn from_arc(config: Arc<AppConfig>) -> Self {
        Self(config)
    }

    pub fn inner(&self) -> &AppConfig {
        &self.0
    }
}

impl apphooks::ConfigProvider for AppConfigProvider {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        // Sections set only through env have no cased counterpart to fold into.
        self.0
            .modules
            .get(module_name)
            .or_else(|| self.0.modules.get(&module_name.to_lowercase()))
    }
}
