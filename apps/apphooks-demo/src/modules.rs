//! Application modules wired into the demo host.

use apphooks::{ApplicationModule, ConfigProvider, ModuleCtx, ModuleKey, ModuleListBuilder};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub endpoint: String,
    pub sample_rate: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:4318".to_string(),
            sample_rate: 100,
        }
    }
}

pub struct AnalyticsModule;

impl ApplicationModule for AnalyticsModule {
    fn configure(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: AnalyticsConfig = ctx.module_config()?;
        anyhow::ensure!(
            cfg.sample_rate <= 100,
            "sample_rate must be a percentage, got {}",
            cfg.sample_rate
        );
        tracing::info!(endpoint = %cfg.endpoint, sample_rate = cfg.sample_rate, "Analytics ready");
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingModuleConfig {
    pub redact_user_ids: bool,
}

pub struct LoggingModule;

impl ApplicationModule for LoggingModule {
    fn dependencies(&self) -> Vec<ModuleKey> {
        vec![ModuleKey::of::<AnalyticsModule>()]
    }

    fn configure(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: LoggingModuleConfig = ctx.module_config()?;
        tracing::info!(redact_user_ids = cfg.redact_user_ids, "Log forwarding ready");
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub enabled: bool,
    pub topics: Vec<String>,
}

pub struct NotificationsModule;

impl ApplicationModule for NotificationsModule {
    fn dependencies(&self) -> Vec<ModuleKey> {
        vec![ModuleKey::of::<AnalyticsModule>()]
    }

    fn configure(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: NotificationsConfig = ctx.module_config()?;
        tracing::info!(enabled = cfg.enabled, topics = ?cfg.topics, "Notification topics registered");
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub flags: Vec<String>,
}

pub struct FeatureModule;

impl ApplicationModule for FeatureModule {
    fn dependencies(&self) -> Vec<ModuleKey> {
        vec![ModuleKey::of::<LoggingModule>()]
    }

    fn configure(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: FeatureConfig = ctx.module_config()?;
        tracing::info!(flags = ?cfg.flags, "Feature flags applied");
        Ok(())
    }
}

fn notifications_enabled(config: &dyn ConfigProvider) -> bool {
    config
        .get_module_config(ModuleKey::of::<NotificationsModule>().as_str())
        .and_then(|v| v.get("enabled"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

/// The demo's module list. Declaration order is deliberately not the
/// configuration order; the runtime sorts it out.
pub fn application_modules(config: &dyn ConfigProvider) -> ModuleListBuilder {
    ModuleListBuilder::new()
        .module(FeatureModule)
        .when(notifications_enabled(config), |b| b.module(NotificationsModule))
        .module(LoggingModule)
        .module(AnalyticsModule)
}
