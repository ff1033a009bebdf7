//! Startup validation for Asset Warden configuration.

use crate::config::AppConfig;
use aw_connectors::AuthFlow;
use aw_core::{AddressCatalog, BusinessUnit};
use aw_observability::LoggingConfig;
use colored::Colorize;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Critical errors that prevent startup.
    pub errors: Vec<String>,
    /// Warnings that should be addressed but don't prevent startup.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Prints the validation result to the console.
    pub fn print(&self) {
        if !self.warnings.is_empty() {
            println!();
            println!("{}", "Configuration Warnings:".yellow().bold());
            for warning in &self.warnings {
                println!("  {} {}", "⚠".yellow(), warning);
            }
        }

        if !self.errors.is_empty() {
            println!();
            println!("{}", "Configuration Errors:".red().bold());
            for error in &self.errors {
                println!("  {} {}", "✗".red(), error);
            }
        }

        if self.errors.is_empty() && self.warnings.is_empty() {
            println!("  {} Configuration OK", "✓".green());
        }
    }
}

/// Validates application configuration before startup.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the configuration, without touching the filesystem.
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::validate_server(config, &mut result);
        Self::validate_assets(config, &mut result);
        Self::validate_identity(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    /// Loads the address catalog named by the configuration and checks that
    /// every business unit has at least one address.
    pub fn validate_catalog(config: &AppConfig, result: &mut ValidationResult) -> Option<AddressCatalog> {
        let catalog = match AddressCatalog::load(&config.assets.addresses_path) {
            Ok(catalog) => catalog,
            Err(e) => {
                result.add_error(e.to_string());
                return None;
            }
        };

        if let Err(e) = catalog.ensure_complete() {
            result.add_error(e.to_string());
        }
        Some(catalog)
    }

    fn validate_server(config: &AppConfig, result: &mut ValidationResult) {
        if let Err(e) = config.server.bind_address() {
            result.add_error(e.to_string());
        }
        if config.server.request_timeout_secs == 0 {
            result.add_error("server.request_timeout_secs must be greater than zero");
        }
    }

    fn validate_assets(config: &AppConfig, result: &mut ValidationResult) {
        if config.assets.count_per_unit == 0 {
            result.add_error("assets.count_per_unit must be a positive integer");
        }
        if config.assets.seed.is_none() {
            result.add_warning(
                "assets.seed not set. Each start generates a different dataset.",
            );
        }
    }

    fn validate_identity(config: &AppConfig, result: &mut ValidationResult) {
        let identity = &config.identity;

        if identity.domain.trim().is_empty() {
            result.add_error("identity.domain must be set");
        }

        if identity.flow == AuthFlow::Oauth
            && (identity.client_id.is_empty() || identity.client_secret.is_empty())
        {
            result.add_error(
                "identity.flow is 'oauth' but identity.client_id or identity.client_secret is empty",
            );
        }

        if identity.flow == AuthFlow::Authn
            && (identity.client_id.is_empty() || identity.client_secret.is_empty())
        {
            result.add_warning(
                "identity.client_id or identity.client_secret is empty. Bearer tokens on /assets cannot be verified and asset requests will fail.",
            );
        }

        if !identity.verify_tls {
            result.add_warning(
                "identity.verify_tls is false. Provider certificates will not be checked.",
            );
        }

        if identity.base_url().starts_with("http://") {
            result.add_warning(format!(
                "identity.domain uses plain HTTP ({}). Credentials will be sent unencrypted.",
                identity.domain
            ));
        }
    }

    fn validate_logging(config: &AppConfig, result: &mut ValidationResult) {
        if let Err(e) = LoggingConfig::from_settings(&config.logging.level, config.logging.json) {
            result.add_error(e);
        }
    }
}

/// Formats per-unit address counts for the validate summary.
pub fn catalog_summary(catalog: &AddressCatalog) -> Vec<String> {
    BusinessUnit::ALL
        .iter()
        .map(|unit| format!("{}: {} addresses", unit, catalog.addresses_for(*unit).len()))
        .collect()
}
