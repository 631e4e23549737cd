//! Catalog service
//!
//! Ingest creates a record from an upload, variant deliveries patch it, and
//! the read side lists records and labels their gallery.
//!
//! Both mutations are read-modify-write on the whole product blob with no
//! coordination (see [`ProductStore`]). A failed write is logged and dropped:
//! the caller still gets the record it would have stored.

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::{GalleryEntry, ProductDetail, ProductRecord};

use crate::cloudinary::notification::VariantDelivery;
use crate::cloudinary::transform::{UrlBuilder, color_from_variant_url};
use crate::cloudinary::{MediaService, UploadRequest};
use crate::error::ServiceResult;
use crate::store::ProductStore;
use crate::utils::validation;

/// Raw upload form fields, as received
#[derive(Debug, Default, Clone)]
pub struct IngestForm {
    pub name: Option<String>,
    pub price: Option<String>,
    /// JSON array of color names
    pub colors: Option<String>,
    pub file: Option<Vec<u8>>,
    pub filename: Option<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: ProductStore,
    media: Arc<dyn MediaService>,
    urls: UrlBuilder,
    max_upload_bytes: usize,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("store", &self.store)
            .field("urls", &self.urls)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl CatalogService {
    pub fn new(
        store: ProductStore,
        media: Arc<dyn MediaService>,
        urls: UrlBuilder,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            media,
            urls,
            max_upload_bytes,
        }
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    /// Upload the image, request one recolored variant per color and append
    /// the resulting record.
    pub async fn ingest(&self, form: IngestForm) -> ServiceResult<ProductRecord> {
        let (Some(name), Some(file)) = (form.name.as_deref(), form.file) else {
            return Err(
                AppError::with_message(ErrorCode::RequiredField, "Missing name or file").into(),
            );
        };
        let name = validation::validate_name(name)?;
        let content_type = validation::validate_image(&file, self.max_upload_bytes)?;
        let colors = validation::parse_colors(form.colors.as_deref())?;
        let price = validation::parse_price(form.price.as_deref());

        let asset = self
            .media
            .upload(UploadRequest {
                data: file,
                filename: form.filename,
                content_type: content_type.to_string(),
                colors,
            })
            .await?;

        let record = ProductRecord::new(
            name,
            price,
            asset.public_id.as_str(),
            self.urls.thumbnail_url(&asset.public_id),
            asset.eager_urls,
        );

        match self.store.append(record.clone()).await {
            Ok(count) => tracing::info!(
                id = %record.id,
                public_id = %record.external_asset_id,
                variants = record.variant_image_urls.len(),
                count,
                "Product created"
            ),
            Err(e) => tracing::error!(
                id = %record.id,
                public_id = %record.external_asset_id,
                error = %e,
                "Product write failed, record not persisted"
            ),
        }

        Ok(record)
    }

    /// Replace the variant URLs of the record matching the delivery's asset id
    pub async fn apply_variants(&self, delivery: VariantDelivery) -> ServiceResult<ProductRecord> {
        let mut records = self.store.read_all().await;

        let Some(record) = records
            .iter_mut()
            .find(|r| r.external_asset_id == delivery.external_asset_id)
        else {
            tracing::warn!(public_id = %delivery.external_asset_id, "Variant delivery for unknown asset");
            return Err(AppError::with_message(ErrorCode::AssetNotFound, "Product not found")
                .with_detail("externalAssetId", delivery.external_asset_id)
                .into());
        };

        record.variant_image_urls = delivery.urls;
        let updated = record.clone();

        match self.store.write_all(&records).await {
            Ok(()) => tracing::info!(
                id = %updated.id,
                public_id = %updated.external_asset_id,
                variants = updated.variant_image_urls.len(),
                "Product variants updated"
            ),
            Err(e) => tracing::error!(
                id = %updated.id,
                public_id = %updated.external_asset_id,
                error = %e,
                "Product write failed, variants not persisted"
            ),
        }

        Ok(updated)
    }

    /// All records, newest first
    pub async fn list(&self) -> Vec<ProductRecord> {
        let mut records = self.store.read_all().await;
        records.reverse();
        records
    }

    /// One record with its gallery labelled by color
    pub async fn get(&self, id: &str) -> ServiceResult<ProductDetail> {
        let product = self
            .store
            .read_all()
            .await
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::ProductNotFound, "Product not found")
                    .with_detail("id", id)
            })?;

        let gallery = gallery(&product.variant_image_urls);
        Ok(ProductDetail { product, gallery })
    }
}

/// Label each variant with the color in its URL, or `Color <n>`
fn gallery(urls: &[String]) -> Vec<GalleryEntry> {
    urls.iter()
        .enumerate()
        .map(|(i, url)| GalleryEntry {
            url: url.clone(),
            color: color_from_variant_url(url)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Color {}", i + 1)),
        })
        .collect()
}
