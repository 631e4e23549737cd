//! Shared harness for the router-level tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use storefront_server::api;
use storefront_server::cloudinary::transform::UrlBuilder;
use storefront_server::cloudinary::{MediaError, MediaService, UploadRequest, UploadedAsset};
use storefront_server::config::Config;
use storefront_server::state::AppState;
use storefront_server::store::{MemoryMedium, ProductStore};

pub const BOUNDARY: &str = "storefront-test-boundary";

/// Smallest byte sequence the upload sniffer recognizes as PNG
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Variants come back in the upload response
    Sync,
    /// Variants come later through the webhook
    Async,
    /// The service rejects every upload
    Failing,
}

/// In-process stand-in for the image service
pub struct FakeMedia {
    delivery: Delivery,
    uploads: AtomicUsize,
    urls: UrlBuilder,
}

impl FakeMedia {
    pub fn new(delivery: Delivery) -> Self {
        Self {
            delivery,
            uploads: AtomicUsize::new(0),
            urls: UrlBuilder::new("https://res.cloudinary.com", "demo", "storefront", "tshirt"),
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaService for FakeMedia {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedAsset, MediaError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.delivery == Delivery::Failing {
            return Err(MediaError::Rejected {
                status: 500,
                message: "Internal error".into(),
            });
        }

        let public_id = format!("storefront/asset-{n}");
        let eager_urls = match self.delivery {
            Delivery::Sync => request
                .colors
                .iter()
                .map(|c| self.urls.variant_url(&public_id, c))
                .collect(),
            _ => Vec::new(),
        };
        Ok(UploadedAsset {
            public_id,
            eager_urls,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: ProductStore,
    pub media: Arc<FakeMedia>,
    pub config: Config,
}

impl TestApp {
    pub fn new(delivery: Delivery) -> Self {
        Self::with(Config::default(), ProductStore::new(MemoryMedium::default()), delivery)
    }

    pub fn with(config: Config, store: ProductStore, delivery: Delivery) -> Self {
        let media = Arc::new(FakeMedia::new(delivery));
        let state = AppState::with_parts(&config, store.clone(), media.clone());
        Self {
            router: api::build_app(state),
            store,
            media,
            config,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = self.router.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn upload(&self, form: &UploadForm<'_>) -> (StatusCode, serde_json::Value) {
        self.send(form.request()).await
    }

    pub async fn webhook(&self, body: &serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::post("/api/cloudinary/webhook")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// Builder for a multipart upload request
#[derive(Debug, Clone, Default)]
pub struct UploadForm<'a> {
    pub name: Option<&'a str>,
    pub price: Option<&'a str>,
    pub colors: Option<&'a str>,
    pub file: Option<&'a [u8]>,
}

impl<'a> UploadForm<'a> {
    pub fn tee(colors: &'a str) -> Self {
        Self {
            name: Some("Crew Tee"),
            price: Some("25"),
            colors: Some(colors),
            file: Some(PNG),
        }
    }

    pub fn body(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in [
            ("name", self.name),
            ("price", self.price),
            ("colors", self.colors),
        ] {
            if let Some(value) = value {
                body.extend_from_slice(
                    format!(
                        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                    )
                    .as_bytes(),
                );
            }
        }
        if let Some(file) = self.file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"tee.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(file);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn request(&self) -> Request<Body> {
        Request::post("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body()))
            .unwrap()
    }
}
