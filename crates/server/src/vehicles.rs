//! Vehicle API endpoints: CRUD, sharing, and the stats-enriched list.

use api_types::vehicle::{
    SharedUsersResponse, VehicleCreated, VehicleNew, VehicleShareNew, VehicleUpdate, VehicleView,
    VehicleWithStats,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{EntityTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{VehicleChanges, VehicleSummary};

pub(crate) fn map_unit_to_api(unit: engine::MileageUnit) -> api_types::MileageUnit {
    match unit {
        engine::MileageUnit::Mi => api_types::MileageUnit::Mi,
        engine::MileageUnit::Km => api_types::MileageUnit::Km,
    }
}

pub(crate) fn map_unit_from_api(unit: api_types::MileageUnit) -> engine::MileageUnit {
    match unit {
        api_types::MileageUnit::Mi => engine::MileageUnit::Mi,
        api_types::MileageUnit::Km => engine::MileageUnit::Km,
    }
}

pub(crate) fn map_summary(summary: VehicleSummary) -> VehicleView {
    VehicleView {
        id: summary.id,
        name: summary.name,
        make: summary.make,
        model: summary.model,
        year: summary.year,
        odometer: summary.odometer,
        mileage_unit: map_unit_to_api(summary.mileage_unit),
        fuel_type: summary.fuel_type,
    }
}

/// The vehicle list, each row enriched with lifetime totals and the count of
/// currently due reminders. One timestamp for the whole fleet.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<VehicleWithStats>>, ServerError> {
    let engine = state.engine.read().await;
    let overviews = engine.fleet_overview(&user.username, Utc::now()).await?;

    let rows = overviews
        .into_iter()
        .map(|overview| VehicleWithStats {
            vehicle: map_summary(overview.vehicle),
            total_cost: overview.total_cost,
            total_miles: overview.total_miles,
            average_mpg: overview.average_mpg,
            fuel_count: overview.fuel_count,
            expense_count: overview.expense_count,
            last_fuel_date: overview.last_fuel_date,
            due_reminders: overview.due_reminders,
        })
        .collect();
    Ok(Json(rows))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<VehicleNew>,
) -> Result<(StatusCode, Json<VehicleCreated>), ServerError> {
    let mut engine = state.engine.write().await;
    let id = engine
        .new_vehicle(
            &user.username,
            payload.make,
            payload.model,
            payload.year,
            payload.odometer.unwrap_or(0.0),
            payload.mileage_unit.map(map_unit_from_api).unwrap_or_default(),
            payload.fuel_type.unwrap_or_else(|| "Petrol".to_string()),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(VehicleCreated { id })))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<VehicleView>, ServerError> {
    let engine = state.engine.read().await;
    let vehicle = engine.vehicle(vehicle_id, &user.username)?;
    Ok(Json(map_summary(vehicle.summary())))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
    Json(payload): Json<VehicleUpdate>,
) -> Result<StatusCode, ServerError> {
    let changes = VehicleChanges {
        make: payload.make,
        model: payload.model,
        year: payload.year,
        odometer: payload.odometer,
        mileage_unit: payload.mileage_unit.map(map_unit_from_api),
        fuel_type: payload.fuel_type,
    };

    let mut engine = state.engine.write().await;
    engine
        .update_vehicle(vehicle_id, &user.username, changes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let mut engine = state.engine.write().await;
    engine.delete_vehicle(vehicle_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn share(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
    Json(payload): Json<VehicleShareNew>,
) -> Result<StatusCode, ServerError> {
    // The engine only knows usernames; make sure this one exists first.
    let target = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.as_str()))
        .one(&state.db)
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    if target.is_none() {
        return Err(ServerError::Engine(engine::EngineError::KeyNotFound(
            "user not exists".to_string(),
        )));
    }

    let mut engine = state.engine.write().await;
    engine
        .share_vehicle(vehicle_id, &user.username, &payload.username)
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn shared_users(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<SharedUsersResponse>, ServerError> {
    let engine = state.engine.read().await;
    let users = engine.shared_users(vehicle_id, &user.username)?;
    Ok(Json(SharedUsersResponse { users }))
}

pub async fn unshare(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((vehicle_id, username)): Path<(Uuid, String)>,
) -> Result<StatusCode, ServerError> {
    let mut engine = state.engine.write().await;
    engine
        .unshare_vehicle(vehicle_id, &user.username, &username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
