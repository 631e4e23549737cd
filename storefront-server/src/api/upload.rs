//! Product ingest API
//!
//! POST /api/upload (multipart) with fields:
//! - `file`: image bytes (required)
//! - `name`: product name (required)
//! - `price`: decimal, absent/invalid means 0
//! - `colors`: JSON array of color names, one recolored variant each
//!
//! Returns the created [`ProductRecord`].

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::{Json, Router, routing::post};
use shared::ProductRecord;
use shared::error::{AppError, ErrorCode};

use crate::error::ServiceResult;
use crate::services::IngestForm;
use crate::state::AppState;

/// Room for the text fields and multipart framing on top of the image
const FORM_OVERHEAD: usize = 64 * 1024;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload_product))
        .layer(DefaultBodyLimit::max(max_upload_bytes + FORM_OVERHEAD))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == http::StatusCode::PAYLOAD_TOO_LARGE {
        AppError::with_message(ErrorCode::PayloadTooLarge, format!("Upload too large: {e}"))
    } else {
        AppError::invalid_request(format!("Multipart error: {e}"))
    }
}

/// POST /api/upload - create a product from an image and a color list
pub async fn upload_product(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServiceResult<Json<ProductRecord>> {
    let mut form = IngestForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                form.filename = field.file_name().map(|s| s.to_string());
                form.file = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            Some("name") => form.name = Some(field.text().await.map_err(multipart_error)?),
            Some("price") => form.price = Some(field.text().await.map_err(multipart_error)?),
            Some("colors") => form.colors = Some(field.text().await.map_err(multipart_error)?),
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown upload field");
            }
        }
    }

    let record = state.catalog.ingest(form).await?;
    Ok(Json(record))
}
