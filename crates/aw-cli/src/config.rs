//! Configuration loading for the Asset Warden CLI.

use anyhow::{Context, Result};
use aw_connectors::{AuthFlow, ConnectorConfig, OktaConfig, SecureString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

const REDACTED: &str = "***REDACTED***";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Creates a copy with secrets redacted.
    pub fn redact_secrets(&self) -> Self {
        let mut config = self.clone();
        if !config.identity.client_secret.is_empty() {
            config.identity.client_secret = REDACTED.to_string();
        }
        config
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// Resolves `host` (an IP literal or a hostname such as `localhost`) and
    /// `port` to the first matching socket address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let host = self.host.trim();
        if host.is_empty() {
            anyhow::bail!("server.host must be set");
        }
        (host, self.port)
            .to_socket_addrs()
            .with_context(|| format!("Invalid bind address {}:{}", host, self.port))?
            .next()
            .with_context(|| format!("Bind address {}:{} resolved to nothing", host, self.port))
    }
}

/// Synthetic asset population settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Assets generated for every business unit.
    #[serde(default = "default_count_per_unit")]
    pub count_per_unit: usize,

    /// Address template source.
    #[serde(default = "default_addresses_path")]
    pub addresses_path: PathBuf,

    /// Seed for reproducible datasets; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Generate each business unit on its own worker thread.
    #[serde(default)]
    pub concurrent: bool,
}

fn default_count_per_unit() -> usize {
    100
}

fn default_addresses_path() -> PathBuf {
    PathBuf::from("data/addresses.json")
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            count_per_unit: default_count_per_unit(),
            addresses_path: default_addresses_path(),
            seed: None,
            concurrent: false,
        }
    }
}

/// Identity provider settings for `/auth` and bearer token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub flow: AuthFlow,

    /// Okta org domain (`dev-123.okta.com`) or full base URL.
    #[serde(default = "default_domain")]
    pub domain: String,

    /// OAuth client id; required by the oauth flow and for bearer token
    /// introspection.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_authorization_server")]
    pub authorization_server: String,

    #[serde(default = "default_identity_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Verify the provider's TLS certificate.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Extra headers sent with every provider request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_domain() -> String {
    "dev-000000.okta.com".to_string()
}

fn default_authorization_server() -> String {
    "default".to_string()
}

fn default_identity_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_verify_tls() -> bool {
    true
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            flow: AuthFlow::default(),
            domain: default_domain(),
            client_id: String::new(),
            client_secret: String::new(),
            authorization_server: default_authorization_server(),
            timeout_secs: default_identity_timeout(),
            max_retries: default_max_retries(),
            verify_tls: default_verify_tls(),
            headers: HashMap::new(),
        }
    }
}

impl IdentityConfig {
    /// Base URL of the Okta org; a bare domain is served over HTTPS.
    pub fn base_url(&self) -> String {
        if self.domain.starts_with("http://") || self.domain.starts_with("https://") {
            self.domain.clone()
        } else {
            format!("https://{}", self.domain)
        }
    }

    /// Gateway configuration for the Okta connectors.
    pub fn to_okta_config(&self) -> OktaConfig {
        let connector = ConnectorConfig {
            name: "okta".to_string(),
            base_url: self.base_url(),
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            verify_tls: self.verify_tls,
            headers: self.headers.clone(),
        };
        let mut config = OktaConfig::new(connector)
            .with_client(self.client_id.clone(), SecureString::new(self.client_secret.clone()));
        config.authorization_server = self.authorization_server.clone();
        config
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
