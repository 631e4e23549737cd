mod common;

use axum::body::Body;
use common::{Delivery, TestApp, UploadForm};
use http::{Request, StatusCode, header};
use serde_json::json;
use sha2::{Digest, Sha256};
use storefront_server::config::Config;
use storefront_server::store::{MemoryMedium, ProductStore};

/// Two products created through the API, variants pending
async fn seeded() -> (TestApp, String, String) {
    let app = TestApp::new(Delivery::Async);
    let (_, a) = app.upload(&UploadForm::tee(r#"["red"]"#)).await;
    let (_, b) = app.upload(&UploadForm::tee(r#"["blue", "green"]"#)).await;
    (
        app,
        a["externalAssetId"].as_str().unwrap().to_string(),
        b["externalAssetId"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_patch_changes_only_the_target_record() {
    let (app, _a, b) = seeded().await;
    let before = app.store.read_all().await;

    let (status, body) = app
        .webhook(&json!({
            "externalAssetId": b,
            "generatedAssets": [{ "url": "https://x/blue" }, { "url": "https://x/green" }]
        }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let after = app.store.read_all().await;
    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1].id, before[1].id);
    assert_eq!(after[1].name, before[1].name);
    assert_eq!(after[1].price, before[1].price);
    assert_eq!(after[1].primary_image_url, before[1].primary_image_url);
    assert_eq!(after[1].variant_image_urls, vec!["https://x/blue", "https://x/green"]);
}

#[tokio::test]
async fn test_provider_notification_shape() {
    let (app, a, _b) = seeded().await;

    let (status, _) = app
        .webhook(&json!({
            "notification_type": "eager",
            "public_id": a,
            "eager": [{
                "transformation": "e_gen_recolor:prompt_tshirt;to-color_red",
                "url": "http://res.cloudinary.com/demo/red",
                "secure_url": "https://res.cloudinary.com/demo/red"
            }]
        }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let stored = app.store.read_all().await;
    assert_eq!(
        stored[0].variant_image_urls,
        vec!["https://res.cloudinary.com/demo/red"]
    );
}

#[tokio::test]
async fn test_patch_replaces_rather_than_appends() {
    let (app, a, _b) = seeded().await;
    for urls in [vec!["https://x/1", "https://x/2"], vec!["https://x/3"]] {
        let assets: Vec<_> = urls.iter().map(|u| json!({ "url": u })).collect();
        let (status, _) = app
            .webhook(&json!({ "externalAssetId": a, "generatedAssets": assets }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(
        app.store.read_all().await[0].variant_image_urls,
        vec!["https://x/3"]
    );
}

#[tokio::test]
async fn test_unknown_asset_is_not_found_and_store_untouched() {
    let (app, _a, _b) = seeded().await;
    let before = app.store.read_all().await;

    let (status, body) = app
        .webhook(&json!({
            "externalAssetId": "storefront/never-uploaded",
            "generatedAssets": [{ "url": "https://x/1" }]
        }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
    assert_eq!(app.store.read_all().await, before);
}

#[tokio::test]
async fn test_malformed_payloads_are_bad_requests() {
    let (app, a, _b) = seeded().await;
    let before = app.store.read_all().await;

    let payloads = [
        json!({ "generatedAssets": [] }),
        json!({ "externalAssetId": "", "generatedAssets": [] }),
        json!({ "externalAssetId": a }),
        json!({ "externalAssetId": a, "generatedAssets": { "url": "https://x" } }),
        json!({ "externalAssetId": a, "generatedAssets": [{ "bytes": 1 }] }),
        json!(["not", "an", "object"]),
        json!([a, [{ "url": "https://x/positional" }]]),
        json!({ "externalAssetId": a, "generatedAssets": [["https://x/positional"]] }),
    ];
    for payload in &payloads {
        let (status, body) = app.webhook(payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
        assert_eq!(body["message"], "Invalid webhook payload");
    }

    let (status, _) = app
        .send(
            Request::post("/api/cloudinary/webhook")
                .body(Body::from("{ truncated"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.store.read_all().await, before);
}

fn signed_request(body: &str, timestamp: i64, secret: &str) -> Request<Body> {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(secret.as_bytes());
    Request::post("/api/cloudinary/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Cld-Timestamp", timestamp.to_string())
        .header("X-Cld-Signature", hex::encode(hasher.finalize()))
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_signature_enforced_when_enabled() {
    let mut config = Config::default();
    config.cloudinary.verify_notifications = true;
    let secret = config.cloudinary.api_secret.clone();
    let app = TestApp::with(
        config,
        ProductStore::new(MemoryMedium::default()),
        Delivery::Async,
    );
    let (_, created) = app.upload(&UploadForm::tee(r#"["red"]"#)).await;
    let asset = created["externalAssetId"].as_str().unwrap();
    let payload = json!({ "public_id": asset, "eager": [{ "secure_url": "https://x/red" }] }).to_string();
    let now = shared::util::now_secs();

    // unsigned
    let (status, _) = app.webhook(&serde_json::from_str(&payload).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // wrong secret
    let (status, _) = app.send(signed_request(&payload, now, "not-the-secret")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // stale
    let (status, body) = app
        .send(signed_request(&payload, now - 3 * 60 * 60, &secret))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);

    // future-dated
    let (status, body) = app
        .send(signed_request(&payload, now + 3 * 60 * 60, &secret))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);

    assert!(app.store.read_all().await[0].variant_image_urls.is_empty());

    let (status, _) = app.send(signed_request(&payload, now, &secret)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.store.read_all().await[0].variant_image_urls,
        vec!["https://x/red"]
    );
}
