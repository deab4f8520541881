//! Repository layer — one trait per table, one implementation per backend.
//!
//! Every operation returns a `Result<T, DbError>` and owns its connection for
//! exactly the duration of the call. No HTTP concerns live here.

pub mod drivers;

pub use drivers::{DriverStore, MySqlDriverRepository};
