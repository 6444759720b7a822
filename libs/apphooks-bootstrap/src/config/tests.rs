use super::*;
use crate::AppConfigProvider;
use apphooks::{ModuleCtx, ModuleKey};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    let logging = config.logging.as_ref().expect("default logging");
    let default = logging.get("default").expect("default section");
    assert_eq!(default.console_level, "info");
    assert!(default.file.is_empty());

    assert!(config.modules_dir.is_none());
    assert!(config.modules.is_empty());
}

#[test]
fn test_yaml_serialization() {
    let config = AppConfig::default();
    let yaml = config.to_yaml().expect("Failed to serialize to YAML");

    assert!(yaml.contains("logging:"));
    assert!(yaml.contains("modules:"));
}

#[test]
fn test_layered_loading_yaml_only() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("app.yaml");

    let yaml_content = r#"
logging:
  default:
    console_level: "warn"
    file: "logs/app.log"
    file_level: "debug"
    max_backups: 5

modules:
  AnalyticsModule:
    endpoint: "https://collect.local"
    sample_rate: 25
  FeatureModule:
    enabled: false
"#;
    fs::write(&config_path, yaml_content).expect("Failed to write config file");

    let config = AppConfig::load_layered(&config_path).expect("Failed to load config");

    let default = &config.logging.as_ref().unwrap()["default"];
    assert_eq!(default.console_level, "warn");
    assert_eq!(default.file, "logs/app.log");
    assert_eq!(default.max_backups, Some(5));
    assert_eq!(default.max_size_mb, None);

    assert_eq!(config.modules.len(), 2);
    assert_eq!(
        config.modules["AnalyticsModule"]["sample_rate"],
        serde_json::json!(25)
    );
    assert_eq!(
        config.modules["FeatureModule"]["enabled"],
        serde_json::json!(false)
    );
}

#[test]
fn test_missing_optional_sections_stay_none() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("app.yaml");
    fs::write(&config_path, "modules: {}\n").unwrap();

    let config = AppConfig::load_layered(&config_path).unwrap();
    assert!(config.logging.is_none());
    assert!(config.modules.is_empty());
}

#[test]
fn test_unknown_top_level_key_is_rejected() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("app.yaml");
    fs::write(&config_path, "server:\n  port: 8080\n").unwrap();

    assert!(AppConfig::load_layered(&config_path).is_err());
}

#[test]
fn test_modules_dir_merges_files() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let modules_dir = temp_dir.path().join("modules");
    fs::create_dir_all(&modules_dir).unwrap();
    fs::write(modules_dir.join("LoggingModule.yaml"), "level: debug\n").unwrap();
    fs::write(modules_dir.join("AnalyticsModule.yml"), "sample_rate: 1\n").unwrap();
    fs::write(modules_dir.join("README.txt"), "ignored").unwrap();

    let config_path = temp_dir.path().join("app.yaml");
    fs::write(
        &config_path,
        r#"
modules_dir: "modules"
modules:
  AnalyticsModule:
    sample_rate: 50
  FeatureModule:
    enabled: true
"#,
    )
    .unwrap();

    let config = AppConfig::load_layered(&config_path).unwrap();

    assert_eq!(config.modules.len(), 3);
    assert_eq!(config.modules["LoggingModule"]["level"], "debug");
    // file wins over the inline section
    assert_eq!(config.modules["AnalyticsModule"]["sample_rate"], 1);
    assert_eq!(config.modules["FeatureModule"]["enabled"], true);
}

#[test]
fn test_env_overrides_yaml() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "app.yaml",
            r#"
logging:
  default:
    console_level: "info"
"#,
        )?;
        // Private prefix so parallel tests loading with APP__ are unaffected.
        jail.set_env("APPHOOKS_JAIL__LOGGING__DEFAULT__CONSOLE_LEVEL", "error");

        let config = AppConfig::load_layered_with_env_prefix("app.yaml", "APPHOOKS_JAIL__")
            .map_err(|e| e.to_string())?;
        let default = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(default.console_level, "error");
        Ok(())
    });
}

#[test]
fn test_env_overrides_module_section_with_cased_key() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "app.yaml",
            r#"
modules:
  AnalyticsModule:
    endpoint: "https://collect.local"
    sample_rate: 25
"#,
        )?;
        jail.set_env("APPHOOKS_JAIL__MODULES__ANALYTICSMODULE__SAMPLE_RATE", "5");
        jail.set_env("APPHOOKS_JAIL__MODULES__AUDITMODULE__ENABLED", "true");

        let config = AppConfig::load_layered_with_env_prefix("app.yaml", "APPHOOKS_JAIL__")
            .map_err(|e| e.to_string())?;

        let mut keys: Vec<_> = config.modules.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["AnalyticsModule", "auditmodule"]);
        assert_eq!(config.modules["AnalyticsModule"]["sample_rate"], 5);
        assert_eq!(
            config.modules["AnalyticsModule"]["endpoint"],
            "https://collect.local"
        );

        // A section only env provides is still found under its module key.
        let provider = AppConfigProvider::new(config);
        let audit = apphooks::ConfigProvider::get_module_config(&provider, "AuditModule");
        assert_eq!(audit.and_then(|v| v.get("enabled")), Some(&serde_json::json!(true)));
        Ok(())
    });
}

#[test]
fn test_cli_overrides_verbose_levels() {
    let test_cases = vec![
        (0, "info"),  // Default, no change
        (1, "debug"), // One -v
        (2, "trace"), // Two -v
        (3, "trace"), // Three+ -v (capped at trace)
    ];

    for (verbose_level, expected_log_level) in test_cases {
        let mut config = AppConfig::default();
        let args = CliArgs {
            verbose: verbose_level,
        };

        config.apply_cli_overrides(&args);

        let logging = config.logging.as_ref().unwrap();
        assert_eq!(
            logging["default"].console_level, expected_log_level,
            "Failed for verbose level {verbose_level}"
        );
    }
}

#[test]
fn test_cli_overrides_create_missing_logging() {
    let mut config = AppConfig {
        logging: None,
        modules_dir: None,
        modules: HashMap::new(),
    };
    config.apply_cli_overrides(&CliArgs { verbose: 1 });
    assert_eq!(config.logging.unwrap()["default"].console_level, "debug");
}

#[test]
fn test_module_ctx_reads_app_config() {
    let mut config = AppConfig::default();
    config.modules.insert(
        "AnalyticsModule".to_string(),
        serde_json::json!({ "endpoint": "https://collect.local", "sample_rate": 10 }),
    );

    #[derive(serde::Deserialize, Default, PartialEq, Debug)]
    struct AnalyticsConfig {
        endpoint: String,
        sample_rate: u32,
    }

    let provider = Arc::new(AppConfigProvider::new(config));
    let ctx = ModuleCtx::new(ModuleKey::new("AnalyticsModule"), provider.clone());
    let cfg: AnalyticsConfig = ctx.module_config().unwrap();
    assert_eq!(cfg.endpoint, "https://collect.local");
    assert_eq!(cfg.sample_rate, 10);

    let other = ModuleCtx::new(ModuleKey::new("FeatureModule"), provider);
    let missing: AnalyticsConfig = other.module_config().unwrap();
    assert_eq!(missing, AnalyticsConfig::default());
}
