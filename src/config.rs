use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storefront_core::{AuthUser, Session, WishlistPolicy};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Identity the CLI acts as
#[derive(Debug, Clone, Serialize)]
pub struct AuthConfig {
    pub uid: ConfigValue<Option<String>>,
    /// Account creation time, used as `CreatedAt` on new products
    pub created_at: ConfigValue<Option<DateTime<Utc>>>,
}

impl AuthConfig {
    /// The configured user, if both uid and creation time are set.
    pub fn user(&self) -> Option<AuthUser> {
        match (&self.uid.value, self.created_at.value) {
            (Some(uid), Some(created_at)) => Some(AuthUser::new(uid.clone(), created_at)),
            _ => None,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory of the local Automerge document store
    pub data_dir: ConfigValue<PathBuf>,
    /// Remote storefront-server; when set it is used instead of `data_dir`
    pub server_url: ConfigValue<Option<String>>,
    pub wishlist_policy: ConfigValue<WishlistPolicy>,
    pub auth: AuthConfig,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AuthFile {
    uid: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    server_url: Option<String>,
    wishlist_policy: Option<WishlistPolicy>,
    auth: Option<AuthFile>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut server_url = ConfigValue::new(None, ConfigSource::Default);
        let mut wishlist_policy =
            ConfigValue::new(WishlistPolicy::default(), ConfigSource::Default);
        let mut uid = ConfigValue::new(None, ConfigSource::Default);
        let mut created_at = ConfigValue::new(None, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(url) = file_config.server_url {
                server_url = ConfigValue::new(Some(url), ConfigSource::File);
            }
            if let Some(policy) = file_config.wishlist_policy {
                wishlist_policy = ConfigValue::new(policy, ConfigSource::File);
            }
            if let Some(auth) = file_config.auth {
                if let Some(id) = auth.uid {
                    uid = ConfigValue::new(Some(id), ConfigSource::File);
                }
                if let Some(at) = auth.created_at {
                    created_at = ConfigValue::new(Some(at), ConfigSource::File);
                }
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("STOREFRONT_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("STOREFRONT_SERVER_URL") {
            server_url = ConfigValue::new(Some(url), ConfigSource::Environment);
        }
        if let Ok(policy) = std::env::var("STOREFRONT_WISHLIST_POLICY") {
            let policy = policy.parse::<WishlistPolicy>().map_err(|e| {
                ConfigError::InvalidValue("STOREFRONT_WISHLIST_POLICY".to_string(), e)
            })?;
            wishlist_policy = ConfigValue::new(policy, ConfigSource::Environment);
        }
        if let Ok(id) = std::env::var("STOREFRONT_UID") {
            uid = ConfigValue::new(Some(id), ConfigSource::Environment);
        }
        if let Ok(at) = std::env::var("STOREFRONT_CREATED_AT") {
            let at = DateTime::parse_from_rfc3339(&at)
                .map_err(|e| {
                    ConfigError::InvalidValue("STOREFRONT_CREATED_AT".to_string(), e.to_string())
                })?
                .with_timezone(&Utc);
            created_at = ConfigValue::new(Some(at), ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            server_url,
            wishlist_policy,
            auth: AuthConfig { uid, created_at },
            config_file,
        })
    }

    /// Session signed in as the configured user, or signed out when no
    /// complete identity is configured.
    pub fn session(&self) -> Session {
        match self.auth.user() {
            Some(user) => Session::signed_in(user),
            None => Session::new(),
        }
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/storefront/
    /// - macOS: ~/Library/Application Support/storefront/
    /// - Windows: %APPDATA%/storefront/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("storefront")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/storefront/
    /// - macOS: ~/Library/Application Support/storefront/
    /// - Windows: %APPDATA%/storefront/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("storefront")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, e) => {
                write!(f, "Invalid value for {}: {}", name, e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
