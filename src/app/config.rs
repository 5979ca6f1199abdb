//! Application configuration.
//!
//! Connection settings are read from `config.toml` in the platform configuration directory
//! and then overridden by the standard AWS environment variables.
//!
//! # config.toml Format
//!
//! ```toml
//! region = "eu-west-1"
//! endpoint_url = "http://localhost:4566"   # optional, e.g. LocalStack
//! access_key_id = "AKIA..."
//! secret_access_key = "..."
//! event_limit = 100
//! verbose_sdk_logging = true
//! auto_connect = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::app::aws_regions::DEFAULT_REGION;
use crate::app::data_plane::cloudwatch_logs::{StaticCredentials, DEFAULT_EVENT_LIMIT};

/// Largest page `GetLogEvents` accepts
pub const MAX_EVENT_LIMIT: i32 = 10_000;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Connection and display settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub region: String,
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    /// Number of events fetched per stream (single page from head)
    pub event_limit: i32,
    /// Log AWS SDK requests and responses while a session is active
    pub verbose_sdk_logging: bool,
    /// Authenticate as soon as the application starts
    pub auto_connect: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            event_limit: DEFAULT_EVENT_LIMIT,
            verbose_sdk_logging: true,
            auto_connect: true,
        }
    }
}

// Secrets stay out of the log file.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| "<set>"))
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("event_limit", &self.event_limit)
            .field("verbose_sdk_logging", &self.verbose_sdk_logging)
            .field("auto_connect", &self.auto_connect)
            .finish()
    }
}

impl AppConfig {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "", "cloudviz")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config.normalized())
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("No config file found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded configuration from {:?}", path);
        Ok(config.normalized())
    }

    /// Apply environment overrides looked up through `lookup`.
    ///
    /// Empty values are ignored so an exported-but-blank variable does not erase the file value.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get("AWS_ACCESS_KEY_ID") {
            self.access_key_id = Some(value);
        }
        if let Some(value) = get("AWS_SECRET_ACCESS_KEY") {
            self.secret_access_key = Some(value);
        }
        if let Some(value) = get("AWS_SESSION_TOKEN") {
            self.session_token = Some(value);
        }
        if let Some(value) = get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")) {
            self.region = value;
        }
        if let Some(value) = get("AWS_ENDPOINT_URL") {
            self.endpoint_url = Some(value);
        }
    }

    pub fn normalized(mut self) -> Self {
        self.region = self.region.trim().to_string();
        self.endpoint_url = self
            .endpoint_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self.event_limit = self.event_limit.clamp(1, MAX_EVENT_LIMIT);
        self
    }

    /// Credentials as configured; validation happens at authentication time.
    pub fn credentials(&self) -> StaticCredentials {
        StaticCredentials {
            access_key_id: self.access_key_id.clone().unwrap_or_default(),
            secret_access_key: self.secret_access_key.clone().unwrap_or_default(),
            session_token: self.session_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.event_limit, 100);
        assert!(config.verbose_sdk_logging);
        assert!(config.endpoint_url.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_path(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
region = "eu-west-1"
endpoint_url = "  http://localhost:4566  "
access_key_id = "AKIATEST"
secret_access_key = "secret"
event_limit = 50000
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.event_limit, MAX_EVENT_LIMIT);
        assert!(config.auto_connect);

        let credentials = config.credentials();
        assert_eq!(credentials.access_key_id, "AKIATEST");
        assert_eq!(credentials.secret_access_key, "secret");
        assert!(credentials.session_token.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "region = [").unwrap();

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            ("AWS_ACCESS_KEY_ID", "AKIAENV"),
            ("AWS_SECRET_ACCESS_KEY", "envsecret"),
            ("AWS_DEFAULT_REGION", "ap-south-1"),
            ("AWS_ENDPOINT_URL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig {
            endpoint_url: Some("http://keep.me".to_string()),
            ..AppConfig::default()
        };
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.access_key_id.as_deref(), Some("AKIAENV"));
        assert_eq!(config.secret_access_key.as_deref(), Some("envsecret"));
        assert_eq!(config.region, "ap-south-1");
        // Blank variables do not override
        assert_eq!(config.endpoint_url.as_deref(), Some("http://keep.me"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AppConfig {
            secret_access_key: Some("super-secret".to_string()),
            ..AppConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
