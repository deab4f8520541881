//! `InMemoryDriverStore` — a test double for `DriverStore`.
//!
//! Mirrors the MySQL repository's observable rules (active filter, ordering,
//! uniqueness across all rows, soft delete) so the HTTP layer can be tested
//! without a live server.

use std::io;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    models::{DriverPatch, DriverRow, NewDriver, Patch, NOTHING_TO_UPDATE},
    repository::DriverStore,
    DbError,
};

/// Behaviour injected into `InMemoryDriverStore` at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehaviour {
    /// Keep rows in memory.
    Healthy,
    /// Fail every call as if the server refused the connection.
    Unreachable,
}

#[derive(Debug)]
struct Table {
    rows: Vec<DriverRow>,
    next_id: i32,
}

/// An in-memory driver table with auto-increment ids starting at 1.
#[derive(Debug)]
pub struct InMemoryDriverStore {
    behaviour: MockBehaviour,
    table: Mutex<Table>,
}

impl Default for InMemoryDriverStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDriverStore {
    pub fn new() -> Self {
        Self::with_behaviour(MockBehaviour::Healthy)
    }

    /// A store whose every operation fails with [`DbError::Connection`].
    pub fn unreachable() -> Self {
        Self::with_behaviour(MockBehaviour::Unreachable)
    }

    pub fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            table: Mutex::new(Table {
                rows: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Every row, active or not, in insertion order.
    pub fn all_rows(&self) -> Vec<DriverRow> {
        self.table.lock().unwrap().rows.clone()
    }

    fn check_reachable(&self) -> Result<(), DbError> {
        match self.behaviour {
            MockBehaviour::Healthy => Ok(()),
            MockBehaviour::Unreachable => Err(DbError::Connection(sqlx::Error::Io(
                io::Error::new(io::ErrorKind::ConnectionRefused, "mock store is unreachable"),
            ))),
        }
    }
}

fn duplicate(value: &str, key: &str) -> DbError {
    DbError::Constraint(format!("Duplicate entry '{value}' for key '{key}'"))
}

#[async_trait]
impl DriverStore for InMemoryDriverStore {
    async fn list_active(&self) -> Result<Vec<DriverRow>, DbError> {
        self.check_reachable()?;
        let table = self.table.lock().unwrap();
        let mut rows: Vec<DriverRow> = table.rows.iter().filter(|r| r.active).cloned().collect();
        rows.sort_by(|a, b| a.first_name.cmp(&b.first_name));
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<DriverRow, DbError> {
        self.check_reachable()?;
        let table = self.table.lock().unwrap();
        table
            .rows
            .iter()
            .find(|r| r.id == id && r.active)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn create(&self, driver: &NewDriver) -> Result<i32, DbError> {
        self.check_reachable()?;
        let mut table = self.table.lock().unwrap();

        if table.rows.iter().any(|r| r.license_number == driver.license_number) {
            return Err(duplicate(&driver.license_number, "numero_licencia"));
        }
        if table.rows.iter().any(|r| r.email == driver.email) {
            return Err(duplicate(&driver.email, "email"));
        }

        let id = table.next_id;
        table.next_id += 1;
        table.rows.push(DriverRow {
            id,
            first_name: driver.first_name.clone(),
            last_name: driver.last_name.clone(),
            license_number: driver.license_number.clone(),
            email: driver.email.clone(),
            phone: driver.phone.clone(),
            active: true,
        });
        Ok(id)
    }

    async fn update(&self, id: i32, patch: &DriverPatch) -> Result<(), DbError> {
        if patch.is_empty() {
            return Err(DbError::BadRequest(NOTHING_TO_UPDATE));
        }
        self.check_reachable()?;
        let mut table = self.table.lock().unwrap();

        // An UPDATE matching no row never reaches the unique key.
        if !table.rows.iter().any(|r| r.id == id) {
            return Err(DbError::NotFound);
        }
        if let Patch::Set(email) = &patch.email {
            if table.rows.iter().any(|r| r.id != id && &r.email == email) {
                return Err(duplicate(email, "email"));
            }
        }

        let row = table
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DbError::NotFound)?;

        if let Patch::Set(v) = patch.first_name.as_patch_ref() {
            row.first_name = v.clone();
        }
        if let Patch::Set(v) = patch.last_name.as_patch_ref() {
            row.last_name = v.clone();
        }
        if let Patch::Set(v) = patch.email.as_patch_ref() {
            row.email = v.clone();
        }
        if let Patch::Set(v) = patch.phone.as_patch_ref() {
            row.phone = v.clone();
        }
        if let Patch::Set(v) = patch.active {
            row.active = v;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> Result<(), DbError> {
        self.check_reachable()?;
        let mut table = self.table.lock().unwrap();
        let row = table
            .rows
            .iter_mut()
            .find(|r| r.id == id && r.active)
            .ok_or(DbError::NotFound)?;
        row.active = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(first: &str, license: &str, email: &str) -> NewDriver {
        NewDriver {
            first_name: first.into(),
            last_name: "Lopez".into(),
            license_number: license.into(),
            email: email.into(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn created_driver_reads_back_active() {
        let store = InMemoryDriverStore::new();
        let new = driver("Ana", "LIC-1", "ana@x.com");

        let row = store.create_and_fetch(&new).await.unwrap();

        assert_eq!(row.id, 1);
        assert!(row.active);
        assert_eq!(row.first_name, new.first_name);
        assert_eq!(row.license_number, new.license_number);
        assert_eq!(store.get(row.id).await.unwrap(), row);
    }

    #[tokio::test]
    async fn listing_is_sorted_and_skips_inactive_rows() {
        let store = InMemoryDriverStore::new();
        store.create(&driver("Zoe", "LIC-1", "z@x.com")).await.unwrap();
        let hidden = store.create(&driver("Bea", "LIC-2", "b@x.com")).await.unwrap();
        store.create(&driver("Ana", "LIC-3", "a@x.com")).await.unwrap();
        store.soft_delete(hidden).await.unwrap();

        let names: Vec<_> = store
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.first_name)
            .collect();
        assert_eq!(names, vec!["Ana", "Zoe"]);
    }

    #[tokio::test]
    async fn duplicate_license_is_a_constraint_violation() {
        let store = InMemoryDriverStore::new();
        store.create(&driver("Ana", "LIC-1", "ana@x.com")).await.unwrap();

        let err = store
            .create(&driver("Eva", "LIC-1", "eva@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Constraint(_)));
        assert_eq!(store.all_rows().len(), 1);
    }

    #[tokio::test]
    async fn deactivated_rows_still_hold_their_email() {
        let store = InMemoryDriverStore::new();
        let id = store.create(&driver("Ana", "LIC-1", "ana@x.com")).await.unwrap();
        store.soft_delete(id).await.unwrap();

        let err = store
            .create(&driver("Ana", "LIC-2", "ana@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[tokio::test]
    async fn empty_patch_leaves_row_unchanged() {
        let store = InMemoryDriverStore::new();
        let id = store.create(&driver("Ana", "LIC-1", "ana@x.com")).await.unwrap();
        let before = store.get(id).await.unwrap();

        let err = store.update(id, &DriverPatch::default()).await.unwrap_err();

        assert!(matches!(err, DbError::BadRequest(_)));
        assert_eq!(store.get(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn updating_a_missing_id_is_not_found() {
        let store = InMemoryDriverStore::new();
        let patch = DriverPatch {
            first_name: Patch::Set("Ana".into()),
            ..DriverPatch::default()
        };
        assert!(matches!(store.update(42, &patch).await, Err(DbError::NotFound)));
    }

    #[tokio::test]
    async fn missing_id_wins_over_a_taken_email() {
        let store = InMemoryDriverStore::new();
        store.create(&driver("Ana", "LIC-1", "ana@x.com")).await.unwrap();
        let patch = DriverPatch {
            email: Patch::Set("ana@x.com".into()),
            ..DriverPatch::default()
        };

        assert!(matches!(store.update(99, &patch).await, Err(DbError::NotFound)));
    }

    #[tokio::test]
    async fn empty_patch_reason_is_spanish() {
        let store = InMemoryDriverStore::new();
        let err = store.update(1, &DriverPatch::default()).await.unwrap_err();
        assert!(matches!(err, DbError::BadRequest(NOTHING_TO_UPDATE)));
    }

    #[tokio::test]
    async fn update_can_reactivate_a_deleted_driver() {
        let store = InMemoryDriverStore::new();
        let id = store.create(&driver("Ana", "LIC-1", "ana@x.com")).await.unwrap();
        store.soft_delete(id).await.unwrap();

        let patch = DriverPatch {
            active: Patch::Set(true),
            ..DriverPatch::default()
        };
        let row = store.update_and_fetch(id, &patch).await.unwrap();
        assert!(row.active);
    }

    #[tokio::test]
    async fn second_soft_delete_is_not_found() {
        let store = InMemoryDriverStore::new();
        let id = store.create(&driver("Ana", "LIC-1", "ana@x.com")).await.unwrap();

        store.soft_delete(id).await.unwrap();
        assert!(matches!(store.soft_delete(id).await, Err(DbError::NotFound)));
    }

    #[tokio::test]
    async fn unreachable_store_fails_with_connection_error() {
        let store = InMemoryDriverStore::unreachable();
        assert!(matches!(store.list_active().await, Err(DbError::Connection(_))));
    }
}
