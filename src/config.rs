use std::env;

use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub locale: LocaleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the ShopMunim backend, e.g. `https://api.shopmunim.com/api`.
    /// Endpoint paths (`/me`, `/notifications`, ...) are appended to it.
    pub base_url: String,
    /// Bearer token sent as `Authorization: Bearer <token>` when present.
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Attempts for idempotent GET requests (429/5xx/network errors are retried).
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Language used for user-facing copy ("en", "hi").
    pub lang: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human readable format.
    pub json: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("SHOPMUNIM_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api".to_string());
        Url::parse(&base_url)
            .map_err(|_| ConfigError::InvalidValue("SHOPMUNIM_API_URL".to_string()))?;

        Ok(Config {
            api: ApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                auth_token: env::var("SHOPMUNIM_TOKEN").ok().filter(|t| !t.is_empty()),
                timeout_seconds: env::var("SHOPMUNIM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("SHOPMUNIM_TIMEOUT_SECS".to_string()))?,
                max_retries: env::var("SHOPMUNIM_MAX_RETRIES")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("SHOPMUNIM_MAX_RETRIES".to_string()))?,
            },
            locale: LocaleConfig {
                lang: crate::i18n::normalize_language(
                    &env::var("SHOPMUNIM_LANG").unwrap_or_else(|_| "en".to_string()),
                ),
            },
            logging: LoggingConfig {
                json: match env::var("SHOPMUNIM_LOG_JSON") {
                    Ok(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"),
                    Err(_) => false,
                },
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:8000/api".to_string(),
            auth_token: None,
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig::default(),
            locale: LocaleConfig {
                lang: crate::i18n::DEFAULT_LANG.to_string(),
            },
            logging: LoggingConfig { json: false },
        }
    }
}
