//! Fuel entry API endpoints.
//!
//! Creating a fill-up also evaluates the vehicle's reminders against the new
//! odometer reading, so the response carries any alerts that fired.

use api_types::fuel::{FuelEntryCreated, FuelEntryNew, FuelEntryUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, reminders::map_alert, server::ServerState, user};
use engine::{FuelEntry, FuelEntryChanges, FuelStats};

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Vec<FuelEntry>>, ServerError> {
    let engine = state.engine.read().await;
    let entries = engine.list_fuel_entries(vehicle_id, &user.username).await?;
    Ok(Json(entries))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
    Json(payload): Json<FuelEntryNew>,
) -> Result<(StatusCode, Json<FuelEntryCreated>), ServerError> {
    let mut engine = state.engine.write().await;
    let (entry, alerts) = engine
        .new_fuel_entry(
            vehicle_id,
            &user.username,
            payload.date,
            payload.gallons,
            payload.price,
            payload.odometer,
            payload.location,
            payload.notes,
            Utc::now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FuelEntryCreated {
            id: entry.id,
            alerts: alerts.into_iter().map(map_alert).collect(),
        }),
    ))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<FuelEntryUpdate>,
) -> Result<StatusCode, ServerError> {
    let changes = FuelEntryChanges {
        date: payload.date,
        gallons: payload.gallons,
        price: payload.price,
        odometer: payload.odometer,
        location: payload.location,
        notes: payload.notes,
    };

    let engine = state.engine.read().await;
    engine
        .update_fuel_entry(entry_id, &user.username, changes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(entry_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let engine = state.engine.read().await;
    engine.delete_fuel_entry(entry_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<FuelStats>, ServerError> {
    let engine = state.engine.read().await;
    let stats = engine.fuel_statistics(vehicle_id, &user.username).await?;
    Ok(Json(stats))
}
