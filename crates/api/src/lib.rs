//! `api` crate — HTTP REST API layer.
//!
//! Exposes:
//!   GET    /
//!   GET    /api/salud
//!   GET    /api/conductores
//!   POST   /api/conductores
//!   GET    /api/conductores/{id}
//!   PUT    /api/conductores/{id}
//!   DELETE /api/conductores/{id}

pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use handlers::{router, AppState};
pub use server::{app, serve, ServeError, ServerConfig};
