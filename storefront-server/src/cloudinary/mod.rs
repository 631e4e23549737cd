//! Image service (Cloudinary) integration
//!
//! - [`transform`]: delivery URL and eager transformation strings
//! - [`signature`]: upload signing and notification verification
//! - [`notification`]: parsing of eager-generation callbacks
//! - [`CloudinaryClient`]: signed multipart upload behind [`MediaService`]

pub mod notification;
pub mod signature;
pub mod transform;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use crate::config::CloudinaryConfig;
use transform::UrlBuilder;

/// Image service errors
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Image service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image service rejected the upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected image service response: {0}")]
    InvalidResponse(String),
}

/// One image to store, plus the colors to derive from it
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    /// Sniffed MIME type, e.g. `image/png`
    pub content_type: String,
    /// Already sanitized color names, one variant each
    pub colors: Vec<String>,
}

/// What the service returned for a stored upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedAsset {
    pub public_id: String,
    /// Variant URLs available right away (empty when generation is async)
    pub eager_urls: Vec<String>,
}

/// Stores originals and derives color variants
#[async_trait]
pub trait MediaService: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedAsset, MediaError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    #[serde(default)]
    eager: Vec<EagerResult>,
}

#[derive(Debug, Deserialize)]
struct EagerResult {
    secure_url: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Signed upload client for the Cloudinary upload API
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
    urls: UrlBuilder,
}

impl std::fmt::Debug for CloudinaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryClient")
            .field("cloud_name", &self.config.cloud_name)
            .field("folder", &self.config.folder)
            .finish()
    }
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let urls = url_builder(&config);
        Ok(Self { http, config, urls })
    }

    fn upload_endpoint(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Parameters that take part in the signature, in no particular order
    fn signed_params(&self, colors: &[String], timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("timestamp", timestamp.to_string()),
            ("folder", self.config.folder.clone()),
        ];

        if !colors.is_empty() {
            let eager = self
                .urls
                .eager_transformations(colors)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("|");
            params.push(("eager", eager));

            if self.config.eager_async {
                params.push(("eager_async", "true".to_string()));
                if let Some(url) = &self.config.notification_url {
                    params.push(("eager_notification_url", url.clone()));
                }
            }
        }

        params
    }
}

/// Builder for delivery URLs under the configured cloud and folder
pub fn url_builder(config: &CloudinaryConfig) -> UrlBuilder {
    UrlBuilder::new(
        config.delivery_base_url.clone(),
        config.cloud_name.clone(),
        config.folder.clone(),
        config.recolor_prompt.clone(),
    )
}

#[async_trait]
impl MediaService for CloudinaryClient {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedAsset, MediaError> {
        let params = self.signed_params(&request.colors, shared::util::now_secs());
        let signature = signature::sign_params(&params, &self.config.api_secret);

        let file_name = request.filename.unwrap_or_else(|| "upload".to_string());
        let part = Part::bytes(request.data)
            .file_name(file_name)
            .mime_str(&request.content_type)?;

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (k, v) in params {
            form = form.text(k, v);
        }

        let resp = self
            .http
            .post(self.upload_endpoint())
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            tracing::warn!(status = status.as_u16(), message = %message, "Image upload rejected");
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        let eager_urls = body
            .eager
            .into_iter()
            .filter_map(|e| e.secure_url.or(e.url))
            .collect::<Vec<_>>();

        tracing::info!(
            public_id = %body.public_id,
            colors = request.colors.len(),
            eager = eager_urls.len(),
            "Image uploaded"
        );

        Ok(UploadedAsset {
            public_id: body.public_id,
            eager_urls,
        })
    }
}
