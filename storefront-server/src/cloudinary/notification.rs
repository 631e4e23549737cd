//! Eager-generation notification payloads
//!
//! Two shapes are accepted:
//!
//! ```json
//! { "externalAssetId": "storefront/abc", "generatedAssets": [{ "url": "https://..." }] }
//! { "public_id": "storefront/abc", "eager": [{ "secure_url": "https://...", "url": "http://..." }] }
//! ```
//!
//! The second is what the image service actually posts; `secure_url` wins
//! over `url` when both are present.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid webhook payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid webhook payload: expected a JSON object")]
    NotAnObject,

    #[error("Invalid webhook payload: missing externalAssetId")]
    MissingAssetId,

    #[error("Invalid webhook payload: missing generatedAssets")]
    MissingAssets,

    #[error("Invalid webhook payload: generated asset #{0} is not an object")]
    AssetNotAnObject(usize),

    #[error("Invalid webhook payload: generated asset #{0} has no url")]
    MissingUrl(usize),
}

#[derive(Debug, Deserialize)]
struct RawNotification {
    #[serde(rename = "externalAssetId", alias = "public_id")]
    external_asset_id: Option<String>,
    #[serde(rename = "generatedAssets", alias = "eager")]
    generated_assets: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    secure_url: Option<String>,
    url: Option<String>,
}

/// A validated delivery of generated variant URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDelivery {
    pub external_asset_id: String,
    /// Variant URLs in the order the service listed them
    pub urls: Vec<String>,
}

impl VariantDelivery {
    /// Parse and validate a raw notification body
    pub fn parse(body: &[u8]) -> Result<Self, NotificationError> {
        // derived Deserialize would also take a positional array
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(NotificationError::NotAnObject);
        }
        let raw: RawNotification = serde_json::from_value(value)?;

        let external_asset_id = raw
            .external_asset_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(NotificationError::MissingAssetId)?;

        let urls = raw
            .generated_assets
            .ok_or(NotificationError::MissingAssets)?
            .into_iter()
            .enumerate()
            .map(|(i, asset)| {
                if !asset.is_object() {
                    return Err(NotificationError::AssetNotAnObject(i));
                }
                let asset: RawAsset = serde_json::from_value(asset)?;
                asset
                    .secure_url
                    .or(asset.url)
                    .filter(|u| !u.is_empty())
                    .ok_or(NotificationError::MissingUrl(i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            external_asset_id,
            urls,
        })
    }
}
