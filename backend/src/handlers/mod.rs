pub mod health;
pub mod items;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;

/// JSON API routes. Everything else falls through to the web client.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health))
        .route("/items", get(items::list_items).post(items::create_item))
        .route(
            "/items/",
            get(items::missing_id)
                .put(items::missing_id)
                .delete(items::missing_id),
        )
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
}
