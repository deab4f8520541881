//! Per-request MySQL connections.
//!
//! No pooling: every repository operation opens its own connection and
//! hands it back to [`Connector::release`] before returning.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, error, warn};

use crate::{DbConfig, DbError};

/// Opens fresh connections from immutable connect options.
#[derive(Debug, Clone)]
pub struct Connector {
    options: MySqlConnectOptions,
}

impl Connector {
    /// Connector targeting the application database named in `config`.
    pub fn new(config: &DbConfig) -> Self {
        Self {
            options: config.database_options(),
        }
    }

    /// Open a new connection. No retry and no health check beyond the handshake.
    pub async fn open(&self) -> Result<MySqlConnection, DbError> {
        debug!("opening store connection");
        connect(&self.options).await
    }

    /// Close a connection obtained from [`Connector::open`].
    pub async fn release(&self, conn: MySqlConnection) {
        close(conn).await;
    }
}

pub(crate) async fn connect(options: &MySqlConnectOptions) -> Result<MySqlConnection, DbError> {
    options.connect().await.map_err(|err| {
        error!(error = %err, "cannot connect to store");
        DbError::Connection(err)
    })
}

pub(crate) async fn close(conn: MySqlConnection) {
    match conn.close().await {
        Ok(()) => debug!("store connection closed"),
        Err(err) => warn!(error = %err, "store connection did not close cleanly"),
    }
}
