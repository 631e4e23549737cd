//! storefront-server: product catalog backed by an image service
//!
//! Uploads are forwarded to the image service, which derives one recolored
//! variant per requested color. Variants arrive later through a webhook and
//! are patched onto the stored product.

pub mod api;
pub mod cloudinary;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
