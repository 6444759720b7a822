use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Prefix of environment overrides, e.g. `APP__LOGGING__DEFAULT__CONSOLE_LEVEL`.
pub const ENV_PREFIX: &str = "APP__";

/// Application configuration: logging plus a flexible per-module
/// configuration bag keyed by module key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Directory containing per-module YAML files (optional).
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Per-module configuration bag: module key → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Section {
    #[serde(default = "default_console_level")]
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/apphooks.log"; empty disables the file sink
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

fn default_console_level() -> String {
    "info".to_string()
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: String::new(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// A relative `modules_dir` is resolved against the directory of the config file.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        Self::load_layered_with_env_prefix(config_path, ENV_PREFIX)
    }

    /// Same as [`load_layered`](Self::load_layered) with a custom env prefix.
    pub fn load_layered_with_env_prefix<P: AsRef<Path>>(
        config_path: P,
        env_prefix: &str,
    ) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let config_path = config_path.as_ref();

        // Optional sections stay None unless YAML/ENV provide them.
        let base = AppConfig {
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path))
            // Example: APP__LOGGING__DEFAULT__CONSOLE_LEVEL=debug
            .merge(Env::prefixed(env_prefix).split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        if let Some(dir) = config.modules_dir.clone() {
            let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
            merge_module_files(&mut config.modules, resolve_relative(&dir, base_dir))?;
        }

        // Env keys arrive lowercased; fold them onto the section they override.
        fold_env_module_keys(&mut config.modules);

        Ok(config)
    }

    /// Load configuration from file or fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => Ok(Self::default()),
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        // Set logging level based on verbose flags for "default" section.
        let logging = self.logging.get_or_insert_with(default_logging_config);
        let default_section = logging
            .entry("default".to_string())
            .or_insert_with(|| Section {
                console_level: default_console_level(),
                file: String::new(),
                file_level: String::new(),
                max_backups: None,
                max_size_mb: None,
            });
        match args.verbose {
            0 => {} // keep
            1 => default_section.console_level = "debug".to_string(),
            _ => default_section.console_level = "trace".to_string(),
        }
    }
}

/// Command line arguments that feed into the config merge.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub verbose: u8,
}

fn resolve_relative(path: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Each `<module>.yaml` / `<module>.yml` file in `dir` becomes the config
/// section of `<module>`, replacing an inline section of the same name.
fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "modules_dir does not exist; skipping");
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "yml" && ext != "yaml" {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read module config {}", path.display()))?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?;
        bag.insert(name.to_string(), serde_json::to_value(val)?);
    }
    Ok(())
}

/// Merges each all-lowercase module key into the one other key it matches
/// case-insensitively (`analyticsmodule` into `AnalyticsModule`). The lowercase
/// entry wins field by field. Keys without such a match are left alone.
fn fold_env_module_keys(bag: &mut HashMap<String, serde_json::Value>) {
    let lowered: Vec<String> = bag
        .keys()
        .filter(|k| k.as_str() == k.to_lowercase())
        .cloned()
        .collect();
    for key in lowered {
        let mut targets = bag
            .keys()
            .filter(|k| **k != key && k.to_lowercase() == key);
        let (Some(target), None) = (targets.next().cloned(), targets.next()) else {
            continue;
        };
        if let Some(overlay) = bag.remove(&key) {
            tracing::debug!(from = %key, to = %target, "Folding env override into module section");
            if let Some(section) = bag.get_mut(&target) {
                merge_json(section, overlay);
            }
        }
    }
}

fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (k, v) in overlay {
                match base.get_mut(&k) {
                    Some(existing) => merge_json(existing, v),
                    None => {
                        base.insert(k, v);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests;
