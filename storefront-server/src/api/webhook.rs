//! Image service notification webhook
//!
//! POST /api/cloudinary/webhook - receives generated variant URLs for an
//! earlier upload and stores them on the matching product.
//!
//! The raw body is kept for signature verification, which is only enforced
//! when `CLOUDINARY_VERIFY_NOTIFICATIONS=true`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Json, Router, routing::post};
use shared::error::{AppError, ErrorCode};

use crate::cloudinary::notification::VariantDelivery;
use crate::cloudinary::signature::{self, SignatureError};
use crate::error::ServiceResult;
use crate::state::{AppState, NotificationAuth};

const SIGNATURE_HEADER: &str = "x-cld-signature";
const TIMESTAMP_HEADER: &str = "x-cld-timestamp";

pub fn router() -> Router<AppState> {
    Router::new().route("/api/cloudinary/webhook", post(handle_webhook))
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(SignatureError::MissingHeader(name))
}

fn verify(auth: &NotificationAuth, headers: &HeaderMap, body: &[u8]) -> Result<(), AppError> {
    let result = header(headers, SIGNATURE_HEADER).and_then(|sig| {
        let ts = header(headers, TIMESTAMP_HEADER)?;
        signature::verify_notification(body, ts, sig, &auth.api_secret, shared::util::now_secs())
    });

    result.map_err(|e| {
        tracing::warn!(error = %e, "Webhook signature verification failed");
        let code = match e {
            SignatureError::Expired => ErrorCode::SignatureExpired,
            _ => ErrorCode::SignatureInvalid,
        };
        AppError::with_message(code, e.to_string())
    })
}

/// POST /api/cloudinary/webhook
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServiceResult<Json<serde_json::Value>> {
    if state.notifications.verify {
        verify(&state.notifications, &headers, &body)?;
    }

    let delivery = VariantDelivery::parse(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected webhook payload");
        AppError::with_message(ErrorCode::InvalidRequest, "Invalid webhook payload")
            .with_detail("reason", e.to_string())
    })?;

    tracing::info!(
        public_id = %delivery.external_asset_id,
        variants = delivery.urls.len(),
        "Received variant delivery"
    );

    state.catalog.apply_variants(delivery).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
