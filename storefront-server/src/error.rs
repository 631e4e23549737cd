//! Service-layer error type
//!
//! `ServiceError` bridges storage and image service errors to the API-layer
//! `AppError`, so services can use `?` and log infrastructure failures once,
//! at the response boundary.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::cloudinary::MediaError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum ServiceError {
    /// Backing medium failure (mapped to StorageError)
    Storage(StoreError),
    /// Image service failure (mapped to UpstreamError)
    Upstream(MediaError),
    /// Business-rule error, passed through as-is
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Storage(e)
    }
}

impl From<MediaError> for ServiceError {
    fn from(e: MediaError) -> Self {
        ServiceError::Upstream(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Storage(err) => {
                tracing::error!(error = %err, "Service storage error");
                AppError::new(ErrorCode::StorageError)
            }
            ServiceError::Upstream(err) => {
                tracing::error!(error = %err, "Image service error");
                match err {
                    MediaError::Rejected { .. } => {
                        AppError::with_message(ErrorCode::UpstreamRejected, err.to_string())
                    }
                    _ => AppError::upstream(err.to_string()),
                }
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
