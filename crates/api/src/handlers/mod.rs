//! Route table and shared handler state.

use std::sync::Arc;

use axum::{routing::get, Router};
use db::DriverStore;

pub mod drivers;
pub mod status;

/// State handed to every handler. The store is immutable once constructed.
#[derive(Clone)]
pub struct AppState {
    pub drivers: Arc<dyn DriverStore>,
}

impl AppState {
    pub fn new(drivers: Arc<dyn DriverStore>) -> Self {
        Self { drivers }
    }
}

/// All routes, without middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::root))
        .route("/api/salud", get(status::health))
        .route("/api/conductores", get(drivers::list).post(drivers::create))
        .route("/api/conductores/", get(drivers::list).post(drivers::create))
        .route(
            "/api/conductores/{id}",
            get(drivers::get).put(drivers::update).delete(drivers::delete),
        )
        .with_state(state)
}
