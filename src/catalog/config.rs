// Copyright 2022 Adobe. All rights reserved.
// This file is licensed to you under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may obtain a copy
// of the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under
// the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR REPRESENTATIONS
// OF ANY KIND, either express or implied. See the License for the specific language
// governing permissions and limitations under the License.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default request timeout for Unity Catalog REST calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Unity Catalog metadata service
///
/// The storage options are handed to the Delta reader when a table's
/// transaction log is opened to read its protocol, so they carry the
/// credentials for the table's storage account, not for the catalog.
///
/// # Examples
///
/// ```
/// use lake_compat::catalog::UnityCatalogConfig;
///
/// let config = UnityCatalogConfig::new("https://adb-123.azuredatabricks.net")
///     .with_token("dapi-TOKEN")
///     .with_option("azure_storage_account_name", "myaccount")
///     .with_option("azure_client_id", "CLIENT_ID");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnityCatalogConfig {
    /// Workspace or Unity Catalog server URL, without the API prefix
    pub endpoint: String,

    /// Bearer token for the REST API
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Storage options for opening Delta tables (object_store keys)
    #[serde(default = "UnityCatalogConfig::default_options")]
    pub storage_options: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl UnityCatalogConfig {
    /// Create a configuration for the given endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of the workspace or Unity Catalog server
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_options: Self::default_options(),
        }
    }

    /// Default storage options applied when opening Delta tables.
    ///
    /// # Returns
    ///
    /// A HashMap containing default timeout and connection pool settings.
    pub fn default_options() -> HashMap<String, String> {
        [
            ("timeout", "120s"),
            ("connect_timeout", "30s"),
            ("pool_idle_timeout", "15s"),
            ("pool_max_idle_per_host", "5"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Set the bearer token used for REST calls.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the REST request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Add a storage option.
    ///
    /// # Arguments
    ///
    /// * `key` - The option key
    /// * `value` - The option value
    ///
    /// # Returns
    ///
    /// The `UnityCatalogConfig` instance with the added option (for method chaining).
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.storage_options.insert(key.into(), value.into());
        self
    }

    /// Add multiple storage options.
    pub fn with_options(mut self, options: HashMap<String, String>) -> Self {
        self.storage_options.extend(options);
        self
    }

    /// Get a storage option.
    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.storage_options.get(key)
    }

    /// Base URL of the Unity Catalog REST API.
    ///
    /// Trailing slashes on the endpoint are ignored, whether the config was
    /// built with [`UnityCatalogConfig::new`] or deserialized.
    pub fn api_base(&self) -> String {
        format!(
            "{}/api/2.1/unity-catalog",
            self.endpoint.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = UnityCatalogConfig::new("https://uc.example.com/");
        assert_eq!(config.endpoint, "https://uc.example.com");
        assert_eq!(
            config.api_base(),
            "https://uc.example.com/api/2.1/unity-catalog"
        );
    }

    #[test]
    fn test_defaults() {
        let config = UnityCatalogConfig::new("http://localhost:8080");
        assert!(config.token.is_none());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.get_option("connect_timeout"), Some(&"30s".to_string()));
    }

    #[test]
    fn test_builder_methods() {
        let mut extra = HashMap::new();
        extra.insert("aws_region".to_string(), "us-east-1".to_string());

        let config = UnityCatalogConfig::new("http://localhost:8080")
            .with_token("secret")
            .with_timeout_secs(5)
            .with_option("timeout", "10s")
            .with_options(extra);

        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.get_option("timeout"), Some(&"10s".to_string()));
        assert_eq!(config.get_option("aws_region"), Some(&"us-east-1".to_string()));
    }

    #[test]
    fn test_api_base_of_deserialized_endpoint_with_trailing_slash() {
        let config: UnityCatalogConfig =
            serde_json::from_str(r#"{"endpoint": "https://uc.example.com//"}"#).unwrap();

        assert_eq!(config.endpoint, "https://uc.example.com//");
        assert_eq!(
            config.api_base(),
            "https://uc.example.com/api/2.1/unity-catalog"
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: UnityCatalogConfig =
            serde_json::from_str(r#"{"endpoint": "http://localhost:8080"}"#).unwrap();

        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.token.is_none());
        assert!(config.get_option("pool_max_idle_per_host").is_some());
    }
}
