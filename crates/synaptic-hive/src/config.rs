use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::HiveError;

/// Endpoint used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.hiveintelligence.xyz/v1/search";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "HIVE_INTELLIGENCE_API_KEY";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "HIVE_BASE_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the Hive Intelligence API.
///
/// These are the only values shared between calls; they never change after
/// the client is built.
#[derive(Clone)]
pub struct HiveConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl HiveConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("synaptic-hive/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build from `HIVE_INTELLIGENCE_API_KEY` and the optional `HIVE_BASE_URL`.
    pub fn from_env() -> Result<Self, HiveError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, HiveError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV).ok_or_else(|| {
            HiveError::Config(format!("environment variable '{API_KEY_ENV}' not set"))
        })?;
        let mut config = Self::new(api_key);
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load a settings file, detecting TOML / JSON / YAML from its extension.
    pub fn load(path: &Path) -> Result<Self, HiveError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            HiveError::Config(format!(
                "cannot detect config format from extension: {}",
                path.display()
            ))
        })?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| HiveError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_settings(&content, format)
    }

    /// Parse a settings document.
    ///
    /// An inline `api_key` wins over the variable named by `api_key_env`
    /// (default `HIVE_INTELLIGENCE_API_KEY`).
    pub fn from_settings(content: &str, format: ConfigFormat) -> Result<Self, HiveError> {
        let settings: HiveSettings = format.parse(content)?;
        let api_key = match settings.api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => key,
            None => std::env::var(&settings.api_key_env).map_err(|_| {
                HiveError::Config(format!(
                    "no api_key in settings and environment variable '{}' not set",
                    settings.api_key_env
                ))
            })?,
        };

        let mut config = Self::new(api_key);
        if let Some(url) = settings.base_url {
            config.base_url = url;
        }
        if let Some(secs) = settings.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ua) = settings.user_agent {
            config.user_agent = ua;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot authenticate.
    pub fn validate(&self) -> Result<(), HiveError> {
        if self.api_key.trim().is_empty() {
            return Err(HiveError::Config("API key must not be empty".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(HiveError::Config("base URL must not be empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for HiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HiveConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct HiveSettings {
    api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

fn default_api_key_env() -> String {
    API_KEY_ENV.to_string()
}

/// Supported settings file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from an extension such as "toml", "json", "yaml" or "yml".
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    fn parse(self, content: &str) -> Result<HiveSettings, HiveError> {
        match self {
            Self::Toml => toml::from_str(content)
                .map_err(|e| HiveError::Config(format!("TOML parse error: {e}"))),
            Self::Json => serde_json::from_str(content)
                .map_err(|e| HiveError::Config(format!("JSON parse error: {e}"))),
            Self::Yaml => serde_yml::from_str(content)
                .map_err(|e| HiveError::Config(format!("YAML parse error: {e}"))),
        }
    }
}
