//! Configuration loading
//!
//! Values come from an optional YAML file (path in `SHOPDESK_CONFIG`,
//! default `shopdesk.yaml` when present) and are then overridden by
//! environment variables:
//!
//! | variable | field |
//! |---|---|
//! | `SHOPDESK_BIND` | `server.bind` |
//! | `FRONTEND_STORE_URL` | `frontend_store_url` |
//! | `STRIPE_API_KEY` | `payment.stripe_api_key` |
//! | `STRIPE_API_BASE` | `payment.stripe_api_base` |
//! | `STRIPE_WEBHOOK_SECRET` | `payment.webhook_secret` |
//! | `SHOPDESK_CURRENCY` | `payment.currency` |
//! | `SHOPDESK_SEED` | `seed_demo_data` |
//! | `SHOPDESK_AUTH_TOKENS` | `auth.tokens`, as `token:user,token:user` |

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::core::error::ConfigError;

pub const CONFIG_PATH_VAR: &str = "SHOPDESK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "shopdesk.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// ISO currency code for every session
    pub currency: String,
    /// Without a key the in-process provider is used
    pub stripe_api_key: Option<String>,
    pub stripe_api_base: Option<String>,
    /// Required by the webhook route
    pub webhook_secret: Option<String>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            currency: "KGS".to_string(),
            stripe_api_key: None,
            stripe_api_base: None,
            webhook_secret: None,
        }
    }
}

/// Bearer tokens accepted by the static auth provider, token to user id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub tokens: HashMap<String, String>,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Storefront base URL used for checkout redirects
    pub frontend_store_url: String,
    pub payment: PaymentConfig,
    pub auth: AuthConfig,
    /// Load the sample store at startup
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            frontend_store_url: "http://localhost:3001".to_string(),
            payment: PaymentConfig::default(),
            auth: AuthConfig::default(),
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Apply overrides from `lookup`, normally the process environment
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("SHOPDESK_BIND") {
            self.server.bind = bind;
        }
        if let Some(url) = lookup("FRONTEND_STORE_URL") {
            self.frontend_store_url = url;
        }
        if let Some(key) = lookup("STRIPE_API_KEY") {
            self.payment.stripe_api_key = non_empty(key);
        }
        if let Some(base) = lookup("STRIPE_API_BASE") {
            self.payment.stripe_api_base = non_empty(base);
        }
        if let Some(secret) = lookup("STRIPE_WEBHOOK_SECRET") {
            self.payment.webhook_secret = non_empty(secret);
        }
        if let Some(currency) = lookup("SHOPDESK_CURRENCY") {
            self.payment.currency = currency;
        }
        if let Some(seed) = lookup("SHOPDESK_SEED") {
            self.seed_demo_data = parse_flag("SHOPDESK_SEED", &seed)?;
        }
        if let Some(tokens) = lookup("SHOPDESK_AUTH_TOKENS") {
            self.auth.tokens.extend(parse_tokens(&tokens)?);
        }
        Ok(self)
    }

    /// File (if any) plus process environment
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_yaml_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => Self::default(),
        };
        base.apply_env_overrides(|key| std::env::var(key).ok())?
            .validated()
    }

    /// Reject values that would only fail later at request time
    pub fn validated(self) -> Result<Self, ConfigError> {
        let currency = self.payment.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue {
                key: "payment.currency".to_string(),
                value: self.payment.currency.clone(),
                message: "expected a three-letter ISO code".to_string(),
            });
        }
        if !self.frontend_store_url.starts_with("http://")
            && !self.frontend_store_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                key: "frontend_store_url".to_string(),
                value: self.frontend_store_url.clone(),
                message: "expected an http(s) URL".to_string(),
            });
        }
        Ok(self)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: "expected a boolean".to_string(),
        }),
    }
}

fn parse_tokens(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once(':') {
            Some((token, user)) if !token.is_empty() && !user.is_empty() => {
                Ok((token.to_string(), user.to_string()))
            }
            _ => Err(ConfigError::InvalidValue {
                key: "SHOPDESK_AUTH_TOKENS".to_string(),
                value: pair.to_string(),
                message: "expected token:user".to_string(),
            }),
        })
        .collect()
}
