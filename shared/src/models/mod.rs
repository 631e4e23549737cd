//! Catalog models

pub mod product;

pub use product::{GalleryEntry, ProductDetail, ProductRecord};
