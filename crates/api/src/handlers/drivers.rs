use axum::{extract::State, http::StatusCode, Json};
use db::models::{DriverPatch, DriverRow, NewDriver};
use serde_json::{json, Value};
use tracing::info;

use super::AppState;
use crate::error::ApiError;
use crate::extract::{DriverId, JsonBody};

const LIST_FAILED: &str = "Error al obtener conductores";
const GET_FAILED: &str = "Error al obtener conductor";
const CREATE_FAILED: &str = "Error al crear conductor";
const UPDATE_FAILED: &str = "Error al actualizar conductor";
const DELETE_FAILED: &str = "Error al eliminar conductor";

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<DriverRow>>, ApiError> {
    let drivers = state
        .drivers
        .list_active()
        .await
        .map_err(|e| ApiError::from_db(e, LIST_FAILED))?;
    Ok(Json(drivers))
}

pub async fn get(
    DriverId(id): DriverId,
    State(state): State<AppState>,
) -> Result<Json<DriverRow>, ApiError> {
    let driver = state
        .drivers
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, GET_FAILED))?;
    Ok(Json(driver))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewDriver>,
) -> Result<(StatusCode, Json<DriverRow>), ApiError> {
    // Insert, then re-read; see `DriverStore::create_and_fetch` for the race.
    let driver = state
        .drivers
        .create_and_fetch(&payload)
        .await
        .map_err(|e| ApiError::from_db(e, CREATE_FAILED))?;
    info!(id = driver.id, "driver registered");
    Ok((StatusCode::CREATED, Json(driver)))
}

pub async fn update(
    DriverId(id): DriverId,
    State(state): State<AppState>,
    JsonBody(patch): JsonBody<DriverPatch>,
) -> Result<Json<DriverRow>, ApiError> {
    let driver = state
        .drivers
        .update_and_fetch(id, &patch)
        .await
        .map_err(|e| ApiError::from_db(e, UPDATE_FAILED))?;
    Ok(Json(driver))
}

pub async fn delete(
    DriverId(id): DriverId,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    state
        .drivers
        .soft_delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, DELETE_FAILED))?;
    Ok(Json(json!({ "mensaje": "Conductor eliminado exitosamente" })))
}
