//! Schema bootstrap: database plus the `conductores`, `sesiones` and
//! `telemetria` tables.
//!
//! Every statement is `IF NOT EXISTS`, so running it repeatedly is a no-op
//! unless `drop_first` is requested.

use sqlx::mysql::MySqlConnection;
use tracing::{error, info, warn};

use crate::connection::{close, connect};
use crate::{DbConfig, DbError};

const CREATE_DRIVERS: &str = r#"
CREATE TABLE IF NOT EXISTS conductores (
    id INT AUTO_INCREMENT PRIMARY KEY,
    nombre VARCHAR(100) NOT NULL,
    apellidos VARCHAR(100) NOT NULL,
    numero_licencia VARCHAR(50) UNIQUE NOT NULL,
    email VARCHAR(255) UNIQUE NOT NULL,
    telefono VARCHAR(15),
    fecha_ultimo_registro DATETIME,
    fecha_registro TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    activo BOOLEAN DEFAULT TRUE
)
"#;

const CREATE_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sesiones (
    id INT AUTO_INCREMENT PRIMARY KEY,
    conductor_id INT NOT NULL,
    fecha_inicio DATETIME NOT NULL,
    fecha_fin DATETIME,
    duracion_minutos INT,
    distancia_km FLOAT,
    estado VARCHAR(50) DEFAULT 'en_progreso',
    fecha_creacion TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (conductor_id) REFERENCES conductores(id) ON DELETE CASCADE
)
"#;

const CREATE_TELEMETRY: &str = r#"
CREATE TABLE IF NOT EXISTS telemetria (
    id INT AUTO_INCREMENT PRIMARY KEY,
    sesion_id INT NOT NULL,
    conductor_id INT NOT NULL,
    timestamp DATETIME NOT NULL,
    parpadeos_por_minuto FLOAT,
    apertura_ojos FLOAT,
    movimiento_cabeza FLOAT,
    nivel_fatiga INT,
    alerta BOOLEAN DEFAULT FALSE,
    datos_adicionales JSON,
    fecha_creacion TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (sesion_id) REFERENCES sesiones(id) ON DELETE CASCADE,
    FOREIGN KEY (conductor_id) REFERENCES conductores(id) ON DELETE CASCADE
)
"#;

/// Table DDL in foreign-key dependency order.
pub const TABLES: [(&str, &str); 3] = [
    ("conductores", CREATE_DRIVERS),
    ("sesiones", CREATE_SESSIONS),
    ("telemetria", CREATE_TELEMETRY),
];

/// Outcome of a bootstrap run that reached the table stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub database: String,
    pub dropped: bool,
    /// Tables whose `CREATE TABLE IF NOT EXISTS` succeeded.
    pub created: Vec<&'static str>,
    /// Tables that failed, with the store's message.
    pub failed: Vec<(&'static str, String)>,
}

impl SchemaReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Create the database and its tables if they do not exist.
///
/// Fails only when the server connection or a database-level statement fails.
/// Individual table failures are logged and recorded in the report.
pub async fn ensure_schema(config: &DbConfig, drop_first: bool) -> Result<SchemaReport, DbError> {
    let database = config.quoted_database()?;

    info!(user = %config.user, host = %config.host, port = config.port, "connecting to MySQL server");
    let mut conn = connect(&config.server_options()).await?;

    let result = bootstrap(&mut conn, &database, drop_first).await;
    close(conn).await;

    let mut report = result?;
    report.database = config.database.clone();
    Ok(report)
}

async fn bootstrap(
    conn: &mut MySqlConnection,
    database: &str,
    drop_first: bool,
) -> Result<SchemaReport, DbError> {
    let mut report = SchemaReport::default();

    if drop_first {
        warn!(database, "dropping existing database");
        execute(conn, "drop_database", &format!("DROP DATABASE IF EXISTS {database}")).await?;
        report.dropped = true;
    }

    execute(conn, "create_database", &format!("CREATE DATABASE IF NOT EXISTS {database}")).await?;
    execute(conn, "use_database", &format!("USE {database}")).await?;
    info!(database, "database ready");

    for (table, ddl) in TABLES {
        match sqlx::raw_sql(ddl).execute(&mut *conn).await {
            Ok(_) => {
                info!(table, "table ready");
                report.created.push(table);
            }
            Err(err) => {
                error!(table, error = %err, "table creation failed, continuing");
                report.failed.push((table, err.to_string()));
            }
        }
    }

    Ok(report)
}

async fn execute(conn: &mut MySqlConnection, op: &'static str, sql: &str) -> Result<(), DbError> {
    sqlx::raw_sql(sql)
        .execute(&mut *conn)
        .await
        .map_err(|err| DbError::from_sqlx(op, err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_created_parents_first() {
        let names: Vec<_> = TABLES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["conductores", "sesiones", "telemetria"]);
    }

    #[test]
    fn every_table_statement_is_idempotent() {
        for (name, ddl) in TABLES {
            assert!(
                ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {name}")),
                "{name} must be created with IF NOT EXISTS"
            );
        }
    }

    #[test]
    fn child_tables_cascade_on_driver_delete() {
        assert!(CREATE_SESSIONS.contains("REFERENCES conductores(id) ON DELETE CASCADE"));
        assert!(CREATE_TELEMETRY.contains("REFERENCES sesiones(id) ON DELETE CASCADE"));
        assert!(CREATE_TELEMETRY.contains("REFERENCES conductores(id) ON DELETE CASCADE"));
    }

    #[test]
    fn report_with_failures_is_incomplete() {
        let report = SchemaReport {
            failed: vec![("sesiones", "boom".into())],
            ..SchemaReport::default()
        };
        assert!(!report.is_complete());
        assert!(SchemaReport::default().is_complete());
    }

    #[tokio::test]
    async fn invalid_database_name_fails_before_connecting() {
        let config = DbConfig {
            database: "bad name".into(),
            ..DbConfig::default()
        };
        let err = ensure_schema(&config, false).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidIdentifier(_)));
    }
}
