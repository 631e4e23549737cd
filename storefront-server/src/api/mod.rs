//! HTTP API
//!
//! | Route | Module |
//! |-------|--------|
//! | POST /api/upload | [`upload`] |
//! | POST /api/cloudinary/webhook | [`webhook`] |
//! | GET /api/products, /api/products/{id} | [`products`] |
//! | GET /health | [`health`] |

pub mod health;
pub mod products;
pub mod upload;
pub mod webhook;

use axum::Router;
use http::{HeaderName, HeaderValue, Uri};
use shared::AppError;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// JSON 404 for paths no route matches
async fn fallback(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

/// All routes, no middleware
pub fn build_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(upload::router(max_upload_bytes))
        .merge(webhook::router())
        .merge(products::router())
        .merge(health::router())
        .fallback(fallback)
}

/// Fully configured application, used by both `main` and the tests
pub fn build_app(state: AppState) -> Router {
    build_router(state.max_upload_bytes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Router layers wrap outward: the id is set before it is propagated
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
