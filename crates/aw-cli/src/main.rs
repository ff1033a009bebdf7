//! Asset Warden CLI
//!
//! Generates a synthetic advertising asset inventory and serves it over HTTP.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

mod commands;
mod config;
mod validator;

use commands::run_server;
use config::AppConfig;
use validator::{catalog_summary, ConfigValidator};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser)]
#[command(name = "asset-warden")]
#[command(version)]
#[command(about = "Synthetic advertising asset inventory API", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate the asset store and start the API server (default)
    Serve(ServeArgs),

    /// Validate configuration and the address catalog
    Validate(ServeArgs),

    /// Show the effective configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },
}

/// Overrides applied on top of the configuration file.
#[derive(Args, Default)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Assets to generate per business unit
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Seed for a reproducible dataset
    #[arg(long)]
    seed: Option<u64>,

    /// Address catalog file
    #[arg(long, value_name = "FILE")]
    addresses: Option<PathBuf>,

    /// Generate each business unit on its own thread
    #[arg(long)]
    concurrent: bool,
}

impl ServeArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(count) = self.count {
            config.assets.count_per_unit = count;
        }
        if self.seed.is_some() {
            config.assets.seed = self.seed;
        }
        if let Some(addresses) = self.addresses {
            config.assets.addresses_path = addresses;
        }
        if self.concurrent {
            config.assets.concurrent = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref(), cli.verbose)?;
    let command = cli.command.unwrap_or(Commands::Serve(ServeArgs::default()));
    match command {
        Commands::Serve(args) => {
            args.apply(&mut config);
            init_logging(&config, cli.verbose)?;
            cmd_serve(config).await
        }
        Commands::Validate(args) => {
            args.apply(&mut config);
            cmd_validate(&config)
        }
        Commands::Config { show_secrets } => cmd_config(&config, show_secrets),
    }
}

/// Loads the configuration file. An explicit path must exist; otherwise
/// `config.yaml` in the working directory is used when present.
fn load_config(path: Option<&Path>, verbose: bool) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            AppConfig::load(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => {
            if verbose {
                eprintln!("Using default configuration (no config file found)");
            }
            Ok(AppConfig::default())
        }
    }
}

fn init_logging(config: &AppConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let logging = aw_observability::LoggingConfig::from_settings(level, config.logging.json)
        .map_err(anyhow::Error::msg)?;
    aw_observability::init_logging_with_config(logging)
        .context("Failed to initialize logging")
}

async fn cmd_serve(config: AppConfig) -> Result<()> {
    println!("{}", "Validating configuration...".cyan());
    let result = ConfigValidator::validate(&config);
    result.print();

    if result.has_errors() {
        println!();
        anyhow::bail!("Configuration validation failed. Fix the errors above before starting the server.");
    }

    println!();
    run_server(config).await
}

fn cmd_validate(config: &AppConfig) -> Result<()> {
    println!("{}", "Validating configuration...".cyan());
    let mut result = ConfigValidator::validate(config);
    let catalog = ConfigValidator::validate_catalog(config, &mut result);
    result.print();

    if let Some(catalog) = catalog {
        println!();
        println!(
            "{} {}",
            "Address catalog:".bold(),
            config.assets.addresses_path.display()
        );
        for line in catalog_summary(&catalog) {
            println!("  {} {}", "→".green(), line);
        }
    }

    println!();
    if result.has_errors() {
        anyhow::bail!("Configuration is invalid");
    }
    println!(
        "{}",
        "Configuration is valid. Server can be started.".green().bold()
    );
    Ok(())
}

fn cmd_config(config: &AppConfig, show_secrets: bool) -> Result<()> {
    let config = if show_secrets {
        config.clone()
    } else {
        config.redact_secrets()
    };
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
    println!("{}", yaml);
    Ok(())
}
