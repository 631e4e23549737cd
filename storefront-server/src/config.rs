//! Storefront server configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Notes |
//! |----------|---------|-------|
//! | ENVIRONMENT | development | development / staging / production |
//! | HTTP_PORT | 3000 | |
//! | STORE_BACKEND | file | file / redis / redb / memory |
//! | PRODUCTS_FILE | data/products.json | file backend |
//! | REDB_PATH | data/products.redb | redb backend |
//! | REDIS_URL | - | required by the redis backend |
//! | PRODUCTS_KEY | products | key holding the product blob |
//! | CLOUDINARY_CLOUD_NAME | - | secret outside development |
//! | CLOUDINARY_API_KEY | - | secret outside development |
//! | CLOUDINARY_API_SECRET | - | secret outside development |
//! | CLOUDINARY_FOLDER | storefront | upload folder, also holds `watermark` |
//! | CLOUDINARY_RECOLOR_PROMPT | tshirt | subject the recolor effect targets |
//! | CLOUDINARY_EAGER_ASYNC | true | deliver variants through the webhook |
//! | CLOUDINARY_NOTIFICATION_URL | - | public URL of the webhook route |
//! | CLOUDINARY_VERIFY_NOTIFICATIONS | false | check X-Cld-Signature on webhooks |
//! | UPSTREAM_TIMEOUT_SECS | 60 | timeout for calls to the image service |
//! | MAX_UPLOAD_BYTES | 10485760 | largest accepted image |

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in {1} environment")]
    MissingSecret(&'static str, String),

    #[error("{0} must not be empty in {1} environment")]
    EmptySecret(&'static str, String),

    #[error("REDIS_URL must be set when STORE_BACKEND=redis")]
    MissingRedisUrl,

    #[error("Unknown STORE_BACKEND '{0}' (expected file, redis, redb or memory)")]
    UnknownBackend(String),
}

/// Where the product blob lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Pretty-printed JSON array in a flat file
    File(PathBuf),
    /// Single key in a Redis-compatible cache
    Redis(String),
    /// Single key in an embedded redb database
    Redb(PathBuf),
    /// Process memory (lost on restart)
    Memory,
}

/// Image service (Cloudinary) settings
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Upload folder; the watermark overlay is expected at `<folder>/watermark`
    pub folder: String,
    /// Subject passed to the generative recolor effect
    pub recolor_prompt: String,
    /// Generate variants in the background and deliver them to the webhook
    pub eager_async: bool,
    /// Where the service should POST eager notifications
    pub notification_url: Option<String>,
    /// Reject webhook calls without a valid `X-Cld-Signature`
    pub verify_notifications: bool,
    /// Upload API base, e.g. `https://api.cloudinary.com`
    pub api_base_url: String,
    /// Delivery base, e.g. `https://res.cloudinary.com`
    pub delivery_base_url: String,
    pub timeout_secs: u64,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    pub http_port: u16,
    pub store: StoreBackend,
    /// Key (or redb table entry) holding the product blob
    pub products_key: String,
    pub cloudinary: CloudinaryConfig,
    pub max_upload_bytes: usize,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &'static str, environment: &str) -> Result<String, ConfigError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(ConfigError::MissingSecret(name, environment.to_string()));
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(ConfigError::EmptySecret(name, environment.to_string()));
        }
        Ok(val)
    }

    fn store_from_env() -> Result<StoreBackend, ConfigError> {
        let backend = env_or("STORE_BACKEND", "file").to_lowercase();
        match backend.as_str() {
            "file" => Ok(StoreBackend::File(
                env_or("PRODUCTS_FILE", "data/products.json").into(),
            )),
            "redb" => Ok(StoreBackend::Redb(
                env_or("REDB_PATH", "data/products.redb").into(),
            )),
            "redis" => std::env::var("REDIS_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .map(StoreBackend::Redis)
                .ok_or(ConfigError::MissingRedisUrl),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env_or("ENVIRONMENT", "development");

        let cloudinary = CloudinaryConfig {
            cloud_name: Self::require_secret("CLOUDINARY_CLOUD_NAME", &environment)?,
            api_key: Self::require_secret("CLOUDINARY_API_KEY", &environment)?,
            api_secret: Self::require_secret("CLOUDINARY_API_SECRET", &environment)?,
            folder: env_or("CLOUDINARY_FOLDER", "storefront"),
            recolor_prompt: env_or("CLOUDINARY_RECOLOR_PROMPT", "tshirt"),
            eager_async: env_parse("CLOUDINARY_EAGER_ASYNC", true),
            notification_url: std::env::var("CLOUDINARY_NOTIFICATION_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            verify_notifications: env_parse("CLOUDINARY_VERIFY_NOTIFICATIONS", false),
            api_base_url: env_or("CLOUDINARY_API_BASE_URL", "https://api.cloudinary.com"),
            delivery_base_url: env_or(
                "CLOUDINARY_DELIVERY_BASE_URL",
                "https://res.cloudinary.com",
            ),
            timeout_secs: env_parse("UPSTREAM_TIMEOUT_SECS", 60),
        };

        Ok(Self {
            http_port: env_parse("HTTP_PORT", 3000),
            store: Self::store_from_env()?,
            products_key: env_or("PRODUCTS_KEY", "products"),
            cloudinary,
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
            environment,
        })
    }
}

impl Default for Config {
    /// Development defaults with an in-memory store
    fn default() -> Self {
        Self {
            environment: "development".into(),
            http_port: 3000,
            store: StoreBackend::Memory,
            products_key: "products".into(),
            cloudinary: CloudinaryConfig {
                cloud_name: "demo".into(),
                api_key: "dev-api-key".into(),
                api_secret: "dev-api-secret".into(),
                folder: "storefront".into(),
                recolor_prompt: "tshirt".into(),
                eager_async: true,
                notification_url: None,
                verify_notifications: false,
                api_base_url: "https://api.cloudinary.com".into(),
                delivery_base_url: "https://res.cloudinary.com".into(),
                timeout_secs: 60,
            },
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}
