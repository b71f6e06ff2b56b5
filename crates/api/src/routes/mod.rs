//! Route handlers for the seen-record API.

pub mod seen_records;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Seen-record CRUD
        .route(
            "/records",
            get(seen_records::list).post(seen_records::create),
        )
        .route(
            "/records/:id",
            get(seen_records::get_by_id)
                .put(seen_records::update)
                .delete(seen_records::delete),
        )
}

/// Health check response.
#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

/// Health check endpoint.
async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}
