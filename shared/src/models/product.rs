//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One catalog entry, as persisted in the product blob.
///
/// `external_asset_id` is the public id the image service assigned at
/// upload time; asynchronous variant deliveries are matched on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub external_asset_id: String,
    pub primary_image_url: String,
    /// One URL per requested color, in request order. Empty until the
    /// image service delivers them when generation is asynchronous.
    #[serde(default)]
    pub variant_image_urls: Vec<String>,
}

impl ProductRecord {
    /// Build a new record with a freshly generated id
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        external_asset_id: impl Into<String>,
        primary_image_url: impl Into<String>,
        variant_image_urls: Vec<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            external_asset_id: external_asset_id.into(),
            primary_image_url: primary_image_url.into(),
            variant_image_urls,
        }
    }
}

/// A variant image together with the color it was generated for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub url: String,
    pub color: String,
}

/// Product detail view: the record plus its labelled gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductRecord,
    pub gallery: Vec<GalleryEntry>,
}
