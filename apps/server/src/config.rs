// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use bim2gis_reproject::DEFAULT_SOURCE_CRS;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Maximum upload size in MB.
    pub max_file_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// CRS assumed for models that name none, or an unregistered one.
    pub default_crs: String,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source; unparsable values fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            max_file_size_mb: lookup("MAX_FILE_SIZE_MB")
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            default_crs: lookup("DEFAULT_CRS")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE_CRS.to_string()),
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| {
                    // Default: allow common development origins
                    "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173".into()
                })
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Upload limit in bytes.
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_file_size_mb, 500);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.default_crs, "EPSG:2951");
        assert_eq!(config.cors_origins.len(), 4);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("MAX_FILE_SIZE_MB", "2"),
            ("DEFAULT_CRS", " EPSG:26918 "),
            ("CORS_ORIGINS", "https://maps.example.org, ,*"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_file_size_bytes(), 2 * 1024 * 1024);
        assert_eq!(config.default_crs, "EPSG:26918");
        assert_eq!(config.cors_origins, vec!["https://maps.example.org", "*"]);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[("PORT", "http"), ("REQUEST_TIMEOUT_SECS", "-1")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout_secs, 60);
    }
}
