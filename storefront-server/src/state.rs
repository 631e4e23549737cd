//! Application state

use std::sync::Arc;

use crate::cloudinary::{self, CloudinaryClient, MediaService};
use crate::config::Config;
use crate::services::CatalogService;
use crate::store::ProductStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Webhook signature settings
#[derive(Debug, Clone)]
pub struct NotificationAuth {
    /// Reject deliveries without a valid `X-Cld-Signature`
    pub verify: bool,
    pub api_secret: String,
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub notifications: NotificationAuth,
    /// Largest accepted image, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Open the configured store and build the image service client
    pub fn new(config: &Config) -> Result<Self, BoxError> {
        let store = ProductStore::open(&config.store, &config.products_key)?;
        let media = Arc::new(CloudinaryClient::new(config.cloudinary.clone())?);
        Ok(Self::with_parts(config, store, media))
    }

    /// Assemble state from an already opened store and media service
    pub fn with_parts(config: &Config, store: ProductStore, media: Arc<dyn MediaService>) -> Self {
        let catalog = CatalogService::new(
            store,
            media,
            cloudinary::url_builder(&config.cloudinary),
            config.max_upload_bytes,
        );
        Self {
            catalog,
            notifications: NotificationAuth {
                verify: config.cloudinary.verify_notifications,
                api_secret: config.cloudinary.api_secret.clone(),
            },
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
