//! Shared types for the storefront workspace
//!
//! Product models, the unified error system and small utilities used by
//! the storefront server and its tests.

pub mod error;
pub mod models;
pub mod util;

pub use error::{AppError, ErrorCode, ErrorResponse};
pub use models::{GalleryEntry, ProductDetail, ProductRecord};
