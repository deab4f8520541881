//! Typed error type for the db crate.

use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The store could not be reached at all.
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// A unique or foreign-key constraint rejected the statement.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("row not found")]
    NotFound,

    /// The request was rejected before any statement was issued.
    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Any other error reported by the store.
    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),
}

impl DbError {
    /// Log `err` with the operation that produced it and translate it into
    /// the nearest taxonomy kind.
    pub fn from_sqlx(op: &'static str, err: sqlx::Error) -> Self {
        error!(op, error = %err, "store operation failed");
        Self::classify(err)
    }

    fn classify(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db_err)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                Self::Constraint(db_err.message().to_owned())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::Connection(err),
            other => Self::Store(other),
        }
    }
}
