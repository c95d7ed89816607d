//! Client configuration.
//!
//! Read from TOML. Every key is optional; missing ones use defaults, and a
//! missing `[auth]` table yields Basic auth with no credential.
//!
//! ```toml
//! base_url = "https://api.foursquare.com"
//! user_agent = "checkin-client:1"
//! timeout_secs = 30
//!
//! [auth]
//! strategy = "oauth"
//! consumer_key = "..."
//! consumer_secret = "..."
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::auth::AuthStrategy;
use crate::client::DEFAULT_BASE_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Explicit configuration for one client instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: Option<String>,
    /// Applied by `UreqTransport`; the core itself never times out.
    pub timeout_secs: u64,
    pub auth: AuthConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum AuthConfig {
    Basic {
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
    },
    OAuth {
        consumer_key: String,
        consumer_secret: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        token_secret: Option<String>,
    },
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig::Basic {
            username: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {source}")]
    Parse { source: toml::de::Error },
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse { source })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn auth_strategy(&self) -> AuthStrategy {
        match &self.auth {
            AuthConfig::Basic { username, password } => AuthStrategy::basic(username, password),
            AuthConfig::OAuth {
                consumer_key,
                consumer_secret,
                token,
                token_secret,
            } => {
                let mut strategy = AuthStrategy::oauth(consumer_key, consumer_secret);
                if let (AuthStrategy::OAuth(oauth), Some(token), Some(secret)) = (&mut strategy, token, token_secret) {
                    oauth.set_token(token, secret);
                }
                strategy
            }
        }
    }
}
