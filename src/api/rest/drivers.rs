use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use tracing::info;

use crate::api::rest::UpdateStatusRequest;
use crate::error::AppError;
use crate::models::driver::{Driver, DriverUpsert};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(upsert_driver).get(list_drivers))
        .route("/drivers/:id", get(get_driver))
        .route("/drivers/:id/status", patch(update_driver_status))
}

async fn upsert_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DriverUpsert>,
) -> Result<Json<Driver>, AppError> {
    let driver = state.store.upsert_driver(payload)?;

    info!(driver_id = %driver.id, name = %driver.name, status = %driver.status, "driver upserted");
    Ok(Json(driver))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<Vec<Driver>> {
    Json(state.store.list_drivers())
}

async fn get_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, AppError> {
    Ok(Json(state.store.get_driver(&id)?))
}

async fn update_driver_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Driver>, AppError> {
    let driver = state.store.set_driver_status(&id, &payload.status)?;

    info!(driver_id = %id, status = %driver.status, "driver status updated");
    Ok(Json(driver))
}
