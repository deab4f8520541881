use axum::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    Json(json!({
        "mensaje": "Bienvenido a la API de Detección de Fatiga",
        "versión": "1.0.0",
        "estado": "En funcionamiento"
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "estado": "OK" }))
}
