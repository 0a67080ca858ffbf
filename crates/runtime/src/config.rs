//! Provider configuration
//!
//! Loaded from a YAML file, then overridden by the `FORTIOS_*` environment
//! variables the provider has always honoured.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const ENV_HOSTNAME: &str = "FORTIOS_ACCESS_HOSTNAME";
pub const ENV_TOKEN: &str = "FORTIOS_ACCESS_TOKEN";
pub const ENV_INSECURE: &str = "FORTIOS_INSECURE";
pub const ENV_CABUNDLE: &str = "FORTIOS_CA_CABUNDLE";
pub const ENV_VDOM: &str = "FORTIOS_VDOM";

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
}

fn default_retries() -> u32 {
    1
}

/// Connection settings of the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub hostname: Option<String>,
    /// API token
    #[serde(default)]
    pub token: Option<String>,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,
    #[serde(default)]
    pub cabundlefile: Option<String>,
    /// VDOM added to every request; the device default applies when unset
    #[serde(default)]
    pub vdom: Option<String>,
    /// Retry count set on the client before every call
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            token: None,
            insecure: false,
            cabundlefile: None,
            vdom: None,
            retries: default_retries(),
        }
    }
}

impl ProviderConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.with_env(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(hostname) = get(ENV_HOSTNAME) {
            self.hostname = Some(hostname);
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(value) = get(ENV_INSECURE) {
            self.insecure = parse_bool(ENV_INSECURE, &value)?;
        }
        if let Some(bundle) = get(ENV_CABUNDLE) {
            self.cabundlefile = Some(bundle);
        }
        if let Some(vdom) = get(ENV_VDOM) {
            self.vdom = Some(vdom);
        }
        Ok(self)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::from_yaml("").unwrap();
        assert_eq!(config.retries, 1);
        assert!(!config.insecure);
        assert!(config.vdom.is_none());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hostname: 192.168.1.99\ntoken: abc\nvdom: dmz\nretries: 3").unwrap();

        let config = ProviderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.hostname.as_deref(), Some("192.168.1.99"));
        assert_eq!(config.vdom.as_deref(), Some("dmz"));
        assert_eq!(config.retries, 3);

        assert!(matches!(
            ProviderConfig::from_file("/nonexistent/provider.yaml"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_HOSTNAME, "10.0.0.1"),
            (ENV_INSECURE, "true"),
            (ENV_VDOM, "root"),
            (ENV_TOKEN, ""),
        ]
        .into_iter()
        .collect();

        let config = ProviderConfig::from_yaml("hostname: fw.local\ntoken: keep")
            .unwrap()
            .with_env(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.hostname.as_deref(), Some("10.0.0.1"));
        assert_eq!(config.token.as_deref(), Some("keep"));
        assert!(config.insecure);
        assert_eq!(config.vdom.as_deref(), Some("root"));
    }

    #[test]
    fn test_invalid_bool() {
        let result = ProviderConfig::default()
            .with_env(|name| (name == ENV_INSECURE).then(|| "maybe".to_string()));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid value 'maybe' for FORTIOS_INSECURE"
        );
    }
}
