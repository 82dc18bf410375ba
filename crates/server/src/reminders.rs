//! Maintenance reminder API endpoints.
//!
//! Every evaluation endpoint samples `now` once and threads it through the
//! engine, so a fleet-wide check classifies all vehicles against the same
//! instant.

use api_types::reminder::{
    AlertStatus as ApiStatus, AlertView, AlertsResponse, FleetAlertView, ReminderComplete,
    ReminderCreated, ReminderNew, ReminderUpdate,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{AlertStatus, FleetAlert, Reminder, ReminderAlert, ReminderChanges};

fn map_status(status: AlertStatus) -> ApiStatus {
    match status {
        AlertStatus::Upcoming => ApiStatus::Upcoming,
        AlertStatus::Soon => ApiStatus::Soon,
        AlertStatus::Overdue => ApiStatus::Overdue,
    }
}

pub(crate) fn map_alert(alert: ReminderAlert) -> AlertView {
    AlertView {
        vehicle_id: alert.vehicle_id,
        reminder_id: alert.reminder_id,
        reminder_name: alert.reminder_name,
        status: map_status(alert.status),
        miles_to_go: alert.miles_to_go,
        days_until_due: alert.days_until_due,
    }
}

fn map_fleet_alert(fleet_alert: FleetAlert) -> FleetAlertView {
    let FleetAlert {
        vehicle_name,
        alert,
    } = fleet_alert;
    FleetAlertView {
        vehicle_id: alert.vehicle_id,
        vehicle_name,
        reminder_id: alert.reminder_id,
        reminder_name: alert.reminder_name,
        status: map_status(alert.status),
        miles_to_go: alert.miles_to_go,
        days_until_due: alert.days_until_due,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Vec<Reminder>>, ServerError> {
    let engine = state.engine.read().await;
    let reminders = engine.list_reminders(vehicle_id, &user.username)?;
    Ok(Json(reminders))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
    Json(payload): Json<ReminderNew>,
) -> Result<(StatusCode, Json<ReminderCreated>), ServerError> {
    let mut engine = state.engine.write().await;
    let id = engine
        .new_reminder(
            vehicle_id,
            &user.username,
            payload.name,
            payload.interval_miles.unwrap_or(0.0),
            payload.interval_days.unwrap_or(0),
            payload.last_service_date,
            payload.last_service_miles.unwrap_or(0.0),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ReminderCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(reminder_id): Path<Uuid>,
    Json(payload): Json<ReminderUpdate>,
) -> Result<StatusCode, ServerError> {
    let changes = ReminderChanges {
        name: payload.name,
        interval_miles: payload.interval_miles,
        interval_days: payload.interval_days,
        last_service_date: payload.last_service_date,
        last_service_miles: payload.last_service_miles,
    };

    let mut engine = state.engine.write().await;
    engine
        .update_reminder(reminder_id, &user.username, changes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(reminder_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let mut engine = state.engine.write().await;
    engine.delete_reminder(reminder_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Marks the service as done with the caller-supplied date and mileage. The
/// next evaluation starts from these fresh baselines.
pub async fn complete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(reminder_id): Path<Uuid>,
    Json(payload): Json<ReminderComplete>,
) -> Result<StatusCode, ServerError> {
    let mut engine = state.engine.write().await;
    engine
        .complete_reminder(
            reminder_id,
            &user.username,
            payload.service_date,
            payload.service_miles,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Actionable alerts for one vehicle.
pub async fn due(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Vec<AlertView>>, ServerError> {
    let engine = state.engine.read().await;
    let alerts = engine.reminder_alerts(vehicle_id, &user.username, Utc::now())?;
    Ok(Json(alerts.into_iter().map(map_alert).collect()))
}

/// Actionable alerts (`soon` and `overdue`) across the whole fleet.
pub async fn check(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<AlertsResponse>, ServerError> {
    let engine = state.engine.read().await;
    let alerts = engine
        .fleet_alerts(&user.username, Utc::now())
        .into_iter()
        .map(map_fleet_alert)
        .collect();
    Ok(Json(AlertsResponse { alerts }))
}

/// Like [`check`], restricted to reminders already past their threshold.
pub async fn overdue(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<AlertsResponse>, ServerError> {
    let engine = state.engine.read().await;
    let alerts = engine
        .fleet_alerts(&user.username, Utc::now())
        .into_iter()
        .filter(|fleet_alert| fleet_alert.alert.status == AlertStatus::Overdue)
        .map(map_fleet_alert)
        .collect();
    Ok(Json(AlertsResponse { alerts }))
}
