//! Report endpoints: per-vehicle detail, fleet comparison, CSV export.

use api_types::report::{ComparisonQuery, ComparisonSortKey};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{ComparisonSort, FleetComparison, VehicleReport};

fn map_sort(sort: ComparisonSortKey) -> ComparisonSort {
    match sort {
        ComparisonSortKey::TotalCost => ComparisonSort::TotalCost,
        ComparisonSortKey::TotalDistance => ComparisonSort::TotalDistance,
        ComparisonSortKey::AverageMpg => ComparisonSort::AverageMpg,
        ComparisonSortKey::CostPerMile => ComparisonSort::CostPerMile,
    }
}

pub async fn vehicle_report(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<VehicleReport>, ServerError> {
    let engine = state.engine.read().await;
    let report = engine
        .vehicle_report(vehicle_id, &user.username, Utc::now())
        .await?;
    Ok(Json(report))
}

pub async fn fleet_comparison(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ComparisonQuery>,
) -> Result<Json<FleetComparison>, ServerError> {
    let sort = map_sort(query.sort.unwrap_or_default());
    let engine = state.engine.read().await;
    let comparison = engine.fleet_comparison(&user.username, sort).await?;
    Ok(Json(comparison))
}

/// Flat CSV of every accessible vehicle's fuel entries and expenses.
pub async fn export_csv(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    let engine = state.engine.read().await;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Vehicle", "Date", "Type", "Category", "Amount", "Odometer", "Notes"])
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    let vehicle_ids: Vec<(Uuid, String)> = engine
        .vehicles_for(&user.username)
        .into_iter()
        .map(|vehicle| (vehicle.id, vehicle.display_name()))
        .collect();

    for (vehicle_id, vehicle_name) in vehicle_ids {
        let entries = engine.list_fuel_entries(vehicle_id, &user.username).await?;
        for entry in entries.iter().rev() {
            let date = entry.date.format("%Y-%m-%d").to_string();
            let price = format!("{:.2}", entry.price);
            let odometer = format!("{:.1}", entry.odometer);
            writer
                .write_record([
                    vehicle_name.as_str(),
                    date.as_str(),
                    "Fuel",
                    "",
                    price.as_str(),
                    odometer.as_str(),
                    entry.notes.as_str(),
                ])
                .map_err(|err| ServerError::Generic(err.to_string()))?;
        }

        let expenses = engine.list_expenses(vehicle_id, &user.username).await?;
        for expense in expenses.iter().rev() {
            let date = expense.date.format("%Y-%m-%d").to_string();
            let amount = format!("{:.2}", expense.amount);
            writer
                .write_record([
                    vehicle_name.as_str(),
                    date.as_str(),
                    "Expense",
                    expense.category.as_str(),
                    amount.as_str(),
                    "",
                    expense.notes.as_str(),
                ])
                .map_err(|err| ServerError::Generic(err.to_string()))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|err| ServerError::Generic(err.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=tagliando-export.csv",
            ),
        ],
        body,
    ))
}
