use anyhow::Result;
use apphooks::{ConfigProvider, ModuleHost};
use apphooks_bootstrap::{AppConfig, AppConfigProvider, CliArgs};
use clap::{Parser, Subcommand};

use std::path::{Path, PathBuf};
use std::sync::Arc;

mod modules;

/// AppHooks demo - configures application modules in dependency order
#[derive(Parser)]
#[command(name = "apphooks-demo")]
#[command(about = "AppHooks demo - configures application modules in dependency order")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and configure all modules
    Run,
    /// Resolve the module order without configuring anything
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        verbose: cli.verbose,
    };

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    // Held until main returns so buffered console lines get flushed.
    let _log_guard =
        apphooks_bootstrap::init_logging(&logging_config, &base_dir(cli.config.as_deref()));

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let provider: Arc<dyn ConfigProvider> = Arc::new(AppConfigProvider::new(config));
    let host = ModuleHost::new(
        modules::application_modules(provider.as_ref()),
        provider.clone(),
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(host),
        Commands::Check => check(&host),
    }
}

fn run(host: ModuleHost) -> Result<()> {
    tracing::info!("Configuring application modules…");
    let configured = host.configure()?;
    println!("Configured {} modules", configured.len());
    Ok(())
}

fn check(host: &ModuleHost) -> Result<()> {
    tracing::info!("Checking module dependencies…");
    let order = host.resolve_order()?;
    println!("Module order is valid:");
    for (i, key) in order.iter().enumerate() {
        println!("  {}. {key}", i + 1);
    }
    Ok(())
}

/// Relative paths in the config (log files) resolve next to the config file.
fn base_dir(config_path: Option<&Path>) -> PathBuf {
    config_path
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
