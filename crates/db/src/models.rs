//! Row structs and write payloads for the `conductores` table.
//!
//! Rust field names are English; the serde and sqlx names are the Spanish
//! column names, which double as the JSON wire names the frontend expects.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// conductores
// ---------------------------------------------------------------------------

/// A persisted driver row, as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DriverRow {
    pub id: i32,
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellidos")]
    #[sqlx(rename = "apellidos")]
    pub last_name: String,
    #[serde(rename = "numero_licencia")]
    #[sqlx(rename = "numero_licencia")]
    pub license_number: String,
    pub email: String,
    #[serde(rename = "telefono")]
    #[sqlx(rename = "telefono")]
    pub phone: Option<String>,
    /// Soft-delete marker; `false` rows are invisible to reads.
    #[serde(rename = "activo")]
    #[sqlx(rename = "activo")]
    pub active: bool,
}

/// Fields accepted when registering a driver. `activo` is always forced to true.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewDriver {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellidos")]
    pub last_name: String,
    #[serde(rename = "numero_licencia")]
    pub license_number: String,
    pub email: String,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

/// A field of a partial update: either left untouched or set to a value.
///
/// For nullable columns use `Patch<Option<T>>`, so an explicit JSON `null`
/// becomes `Set(None)` while a missing key stays `Keep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    pub fn as_patch_ref(&self) -> Patch<&T> {
        match self {
            Self::Keep => Patch::Keep,
            Self::Set(value) => Patch::Set(value),
        }
    }
}

// Only reached when the key is present; `#[serde(default)]` covers absence.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Set)
    }
}

/// Client-facing reason for rejecting a patch with no fields.
pub const NOTHING_TO_UPDATE: &str = "No hay campos para actualizar";

/// Value bound to one `column = ?` assignment of an UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Text(String),
    NullableText(Option<String>),
    Flag(bool),
}

/// Partial update of a driver. The license number is immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverPatch {
    #[serde(rename = "nombre")]
    pub first_name: Patch<String>,
    #[serde(rename = "apellidos")]
    pub last_name: Patch<String>,
    pub email: Patch<String>,
    #[serde(rename = "telefono")]
    pub phone: Patch<Option<String>>,
    #[serde(rename = "activo")]
    pub active: Patch<bool>,
}

impl DriverPatch {
    pub fn is_empty(&self) -> bool {
        !(self.first_name.is_set()
            || self.last_name.is_set()
            || self.email.is_set()
            || self.phone.is_set()
            || self.active.is_set())
    }

    /// The `(column, value)` pairs this patch writes, in a fixed column order.
    pub fn assignments(&self) -> Vec<(&'static str, ColumnValue)> {
        let mut out = Vec::new();
        if let Patch::Set(v) = &self.first_name {
            out.push(("nombre", ColumnValue::Text(v.clone())));
        }
        if let Patch::Set(v) = &self.last_name {
            out.push(("apellidos", ColumnValue::Text(v.clone())));
        }
        if let Patch::Set(v) = &self.email {
            out.push(("email", ColumnValue::Text(v.clone())));
        }
        if let Patch::Set(v) = &self.phone {
            out.push(("telefono", ColumnValue::NullableText(v.clone())));
        }
        if let Patch::Set(v) = self.active {
            out.push(("activo", ColumnValue::Flag(v)));
        }
        out
    }
}
