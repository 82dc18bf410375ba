//! Expense API endpoints.

use api_types::expense::{ExpenseCreated, ExpenseNew, ExpenseUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{Expense, ExpenseChanges, ExpenseStats};

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let engine = state.engine.read().await;
    let expenses = engine.list_expenses(vehicle_id, &user.username).await?;
    Ok(Json(expenses))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let engine = state.engine.read().await;
    let id = engine
        .new_expense(
            vehicle_id,
            &user.username,
            payload.category,
            payload.amount,
            payload.date,
            payload.notes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ExpenseCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<StatusCode, ServerError> {
    let changes = ExpenseChanges {
        category: payload.category,
        amount: payload.amount,
        date: payload.date,
        notes: payload.notes,
    };

    let engine = state.engine.read().await;
    engine
        .update_expense(expense_id, &user.username, changes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let engine = state.engine.read().await;
    engine.delete_expense(expense_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<ExpenseStats>, ServerError> {
    let engine = state.engine.read().await;
    let stats = engine.expense_statistics(vehicle_id, &user.username).await?;
    Ok(Json(stats))
}
