//! Store connection settings.

use sqlx::mysql::MySqlConnectOptions;

use crate::DbError;

/// Immutable MySQL connection settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Name of the application database (also the target of schema bootstrap).
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3306,
            user: "root".into(),
            password: String::new(),
            database: "fatigue_detection".into(),
        }
    }
}

impl DbConfig {
    /// Options for connecting to the server without selecting a database.
    pub fn server_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
    }

    /// Options for connecting straight into the application database.
    pub fn database_options(&self) -> MySqlConnectOptions {
        self.server_options().database(&self.database)
    }

    /// The database name quoted for interpolation into DDL.
    ///
    /// Only ASCII letters, digits, `_` and `$` are accepted, so the name can
    /// never break out of the backticks.
    pub fn quoted_database(&self) -> Result<String, DbError> {
        let name = self.database.as_str();
        let valid = !name.is_empty()
            && name.len() <= 64
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        if !valid {
            return Err(DbError::InvalidIdentifier(name.to_owned()));
        }
        Ok(format!("`{name}`"))
    }
}
