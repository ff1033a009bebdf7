//! Helpers for testing gateway implementations.

use crate::traits::ConnectorConfig;
use std::collections::HashMap;

/// Creates a test connector config with sensible defaults and no retries.
pub fn test_connector_config(name: &str, base_url: &str) -> ConnectorConfig {
    ConnectorConfig {
        name: name.to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
        max_retries: 0,
        verify_tls: true,
        headers: HashMap::new(),
    }
}
