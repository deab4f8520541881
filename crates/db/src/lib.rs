//! `db` crate — pure persistence layer.
//!
//! Provides per-request MySQL connections, schema bootstrap, typed row
//! structs, and the driver repository. No HTTP concerns live here.

pub mod config;
pub mod connection;
pub mod error;
pub mod mock;
pub mod models;
pub mod repository;
pub mod schema;

pub use config::DbConfig;
pub use connection::Connector;
pub use error::DbError;
pub use repository::{DriverStore, MySqlDriverRepository};
pub use schema::{ensure_schema, SchemaReport};
