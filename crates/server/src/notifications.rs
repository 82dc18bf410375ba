//! Notification API endpoints: unread list, badge counts, read/dismiss.

use api_types::notification::NotificationSummary;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::Notification;

pub async fn list_unread(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Notification>>, ServerError> {
    let engine = state.engine.read().await;
    let notifications = engine.unread_notifications(&user.username).await?;
    Ok(Json(notifications))
}

pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<NotificationSummary>, ServerError> {
    let engine = state.engine.read().await;
    let summary = engine.notification_summary(&user.username).await?;
    Ok(Json(NotificationSummary {
        unread_count: summary.unread_count,
        overdue_count: summary.overdue_count,
        upcoming_count: summary.upcoming_count,
    }))
}

pub async fn mark_read(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let engine = state.engine.read().await;
    engine
        .mark_notification_read(notification_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn dismiss(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let engine = state.engine.read().await;
    engine
        .dismiss_notification(notification_id, &user.username, Utc::now())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
