//! Driver CRUD operations against the `conductores` table.

use async_trait::async_trait;
use sqlx::mysql::MySqlConnection;
use sqlx::{MySql, QueryBuilder};
use tracing::{debug, info};

use crate::{
    connection::Connector,
    models::{ColumnValue, DriverPatch, DriverRow, NewDriver, NOTHING_TO_UPDATE},
    DbError,
};

const LIST_ACTIVE: &str = r#"
SELECT id, nombre, apellidos, numero_licencia, email, telefono, activo
FROM conductores
WHERE activo = TRUE
ORDER BY nombre ASC
"#;

const GET_ACTIVE: &str = r#"
SELECT id, nombre, apellidos, numero_licencia, email, telefono, activo
FROM conductores
WHERE id = ? AND activo = TRUE
"#;

/// Persistence contract for drivers.
///
/// Implementations must treat `activo = FALSE` rows as invisible to reads
/// while still counting them for license/email uniqueness.
#[async_trait]
pub trait DriverStore: Send + Sync {
    /// Every active driver, ordered by first name ascending.
    async fn list_active(&self) -> Result<Vec<DriverRow>, DbError>;

    /// The active driver with `id`, or [`DbError::NotFound`].
    async fn get(&self, id: i32) -> Result<DriverRow, DbError>;

    /// Insert an active driver and return its new id.
    async fn create(&self, driver: &NewDriver) -> Result<i32, DbError>;

    /// Apply `patch` to the driver with `id`, active or not.
    ///
    /// # Errors
    /// - [`DbError::BadRequest`] if the patch is empty; the store is not touched.
    /// - [`DbError::NotFound`] if no row has that id.
    async fn update(&self, id: i32, patch: &DriverPatch) -> Result<(), DbError>;

    /// Mark an active driver inactive. Already-inactive rows are [`DbError::NotFound`].
    async fn soft_delete(&self, id: i32) -> Result<(), DbError>;

    /// Insert, then read the row back.
    ///
    /// The two steps are not atomic: a soft delete landing in between turns a
    /// successful insert into [`DbError::NotFound`].
    async fn create_and_fetch(&self, driver: &NewDriver) -> Result<DriverRow, DbError> {
        let id = self.create(driver).await?;
        self.get(id).await
    }

    /// Update, then read the row back. Same non-atomic caveat as
    /// [`DriverStore::create_and_fetch`]; updating a row to inactive also
    /// reads back as [`DbError::NotFound`].
    async fn update_and_fetch(&self, id: i32, patch: &DriverPatch) -> Result<DriverRow, DbError> {
        self.update(id, patch).await?;
        self.get(id).await
    }
}

/// [`DriverStore`] backed by MySQL, one connection per call.
#[derive(Debug, Clone)]
pub struct MySqlDriverRepository {
    connector: Connector,
}

impl MySqlDriverRepository {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl DriverStore for MySqlDriverRepository {
    async fn list_active(&self) -> Result<Vec<DriverRow>, DbError> {
        let mut conn = self.connector.open().await?;
        let result = sqlx::query_as::<_, DriverRow>(LIST_ACTIVE)
            .fetch_all(&mut conn)
            .await;
        self.connector.release(conn).await;

        result.map_err(|err| DbError::from_sqlx("list_active", err))
    }

    async fn get(&self, id: i32) -> Result<DriverRow, DbError> {
        let mut conn = self.connector.open().await?;
        let result = sqlx::query_as::<_, DriverRow>(GET_ACTIVE)
            .bind(id)
            .fetch_optional(&mut conn)
            .await;
        self.connector.release(conn).await;

        result
            .map_err(|err| DbError::from_sqlx("get", err))?
            .ok_or(DbError::NotFound)
    }

    async fn create(&self, driver: &NewDriver) -> Result<i32, DbError> {
        let mut conn = self.connector.open().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO conductores (nombre, apellidos, numero_licencia, email, telefono, activo)
            VALUES (?, ?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(&driver.first_name)
        .bind(&driver.last_name)
        .bind(&driver.license_number)
        .bind(&driver.email)
        .bind(&driver.phone)
        .execute(&mut conn)
        .await;
        self.connector.release(conn).await;

        let raw_id = result
            .map_err(|err| DbError::from_sqlx("create", err))?
            .last_insert_id();
        let id = i32::try_from(raw_id).map_err(|_| {
            DbError::from_sqlx(
                "create",
                sqlx::Error::Protocol(format!("insert id {raw_id} does not fit an INT column")),
            )
        })?;

        info!(id, "driver created");
        Ok(id)
    }

    async fn update(&self, id: i32, patch: &DriverPatch) -> Result<(), DbError> {
        if patch.is_empty() {
            return Err(DbError::BadRequest(NOTHING_TO_UPDATE));
        }

        let mut conn = self.connector.open().await?;
        let result = apply_patch(&mut conn, id, patch).await;
        self.connector.release(conn).await;

        result?;
        info!(id, "driver updated");
        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> Result<(), DbError> {
        let mut conn = self.connector.open().await?;
        let result = sqlx::query("UPDATE conductores SET activo = FALSE WHERE id = ? AND activo = TRUE")
            .bind(id)
            .execute(&mut conn)
            .await;
        self.connector.release(conn).await;

        let done = result.map_err(|err| DbError::from_sqlx("soft_delete", err))?;
        if done.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        info!(id, "driver deactivated");
        Ok(())
    }
}

/// Build the UPDATE from the patch's explicit assignments and run it.
async fn apply_patch(
    conn: &mut MySqlConnection,
    id: i32,
    patch: &DriverPatch,
) -> Result<(), DbError> {
    let mut builder = update_statement(id, patch);
    let done = builder
        .build()
        .execute(&mut *conn)
        .await
        .map_err(|err| DbError::from_sqlx("update", err))?;

    if done.rows_affected() > 0 {
        return Ok(());
    }

    // MySQL may report zero affected rows when the values were already equal,
    // so a zero only means "missing" once the id is confirmed absent.
    debug!(id, "update changed no rows, probing for the id");
    let matching: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conductores WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| DbError::from_sqlx("update", err))?;

    if matching == 0 {
        Err(DbError::NotFound)
    } else {
        Ok(())
    }
}

fn update_statement(id: i32, patch: &DriverPatch) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::<MySql>::new("UPDATE conductores SET ");
    {
        let mut set = builder.separated(", ");
        for (column, value) in patch.assignments() {
            set.push(column);
            set.push_unseparated(" = ");
            match value {
                ColumnValue::Text(v) => set.push_bind_unseparated(v),
                ColumnValue::NullableText(v) => set.push_bind_unseparated(v),
                ColumnValue::Flag(v) => set.push_bind_unseparated(v),
            };
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder
}
