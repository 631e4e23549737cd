//! The store has no coordination around read-modify-write. These tests pin
//! down that behaviour rather than guard against it.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use common::{Delivery, TestApp, UploadForm};
use http::StatusCode;
use storefront_server::config::Config;
use storefront_server::store::{BlobMedium, MemoryMedium, ProductStore, StoreResult};
use tokio::sync::Barrier;

/// Holds the first `gated` reads until that many readers have arrived, so
/// every one of them sees the same snapshot.
struct GatedMedium {
    inner: MemoryMedium,
    barrier: Barrier,
    gated: usize,
    reads: AtomicUsize,
}

impl GatedMedium {
    fn new(gated: usize) -> Self {
        Self {
            inner: MemoryMedium::default(),
            barrier: Barrier::new(gated),
            gated,
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BlobMedium for GatedMedium {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn get(&self) -> StoreResult<Option<Vec<u8>>> {
        let blob = self.inner.get().await?;
        if self.reads.fetch_add(1, Ordering::SeqCst) < self.gated {
            self.barrier.wait().await;
        }
        Ok(blob)
    }

    async fn put(&self, blob: Vec<u8>) -> StoreResult<()> {
        self.inner.put(blob).await
    }
}

#[tokio::test]
async fn test_concurrent_ingests_lose_a_record() {
    let medium = Arc::new(GatedMedium::new(2));
    let store = ProductStore::from_arc(medium.clone());
    let app = TestApp::with(Config::default(), store, Delivery::Sync);

    let first = UploadForm {
        name: Some("First"),
        ..UploadForm::tee("[]")
    };
    let second = UploadForm {
        name: Some("Second"),
        ..UploadForm::tee("[]")
    };
    let ((s1, _), (s2, _)) = futures::future::join(app.upload(&first), app.upload(&second)).await;

    // both callers are told their product was created
    assert_eq!(s1, StatusCode::OK);
    assert_eq!(s2, StatusCode::OK);
    assert_eq!(app.media.uploads(), 2);

    // last write wins
    assert_eq!(app.store.read_all().await.len(), 1);
}

#[tokio::test]
async fn test_sequential_ingests_keep_every_record() {
    let app = TestApp::new(Delivery::Sync);
    for _ in 0..3 {
        let (status, _) = app.upload(&UploadForm::tee("[]")).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(app.store.read_all().await.len(), 3);
}

#[tokio::test]
async fn test_file_store_round_trip_through_api() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data/products.json");
    let store = ProductStore::open(
        &storefront_server::config::StoreBackend::File(path.clone()),
        "products",
    )
    .unwrap();
    let app = TestApp::with(Config::default(), store, Delivery::Sync);

    let (status, created) = app.upload(&UploadForm::tee(r#"["red"]"#)).await;
    assert_eq!(status, StatusCode::OK);

    let text = std::fs::read_to_string(&path).unwrap();
    let on_disk: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(on_disk.as_array().unwrap().len(), 1);
    assert_eq!(on_disk[0]["id"], created["id"]);

    // re-opening the same file sees the record
    let reopened = ProductStore::open(
        &storefront_server::config::StoreBackend::File(path),
        "products",
    )
    .unwrap();
    assert_eq!(reopened.read_all().await.len(), 1);
}
