//! Catalog read API
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | /api/products | All products, newest first |
//! | GET | /api/products/{id} | One product with its labelled gallery |

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use shared::{ProductDetail, ProductRecord};

use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(get_by_id))
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<ProductRecord>> {
    Json(state.catalog.list().await)
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<ProductDetail>> {
    Ok(Json(state.catalog.get(&id).await?))
}
