//! Vendor-format importers.
//!
//! Only the Hammond JSON export survives from the import endpoints of old:
//! the other formats never got past a stub upstream. Row failures are
//! collected in the summary; one bad record never aborts the batch.

use api_types::import::{HammondExport, ImportSummary};
use axum::{Extension, Json, extract::State};
use chrono::{NaiveDate, TimeZone, Utc};

use crate::{ServerError, server::ServerState, user};

pub async fn hammond(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<HammondExport>,
) -> Result<Json<ImportSummary>, ServerError> {
    let mut summary = ImportSummary::default();
    let mut engine = state.engine.write().await;
    let now = Utc::now();

    // Hammond exports are per-vehicle: fuel entries carry no vehicle
    // reference and attach to the first vehicle of the file.
    let mut first_vehicle = None;

    for vehicle in payload.vehicles {
        let label = if vehicle.name.is_empty() {
            format!("{} {}", vehicle.make, vehicle.model)
        } else {
            vehicle.name.clone()
        };
        match engine
            .new_vehicle(
                &user.username,
                vehicle.make,
                vehicle.model,
                vehicle.year,
                vehicle.odometer,
                engine::MileageUnit::Mi,
                "Petrol".to_string(),
            )
            .await
        {
            Ok(id) => {
                summary.vehicles += 1;
                first_vehicle.get_or_insert(id);
            }
            Err(err) => summary
                .errors
                .push(format!("Failed to import vehicle {label}: {err}")),
        }
    }

    let Some(vehicle_id) = first_vehicle else {
        if !payload.fuel_entries.is_empty() {
            summary
                .errors
                .push("No vehicle imported; fuel entries skipped".to_string());
        }
        return Ok(Json(summary));
    };

    // Imports arrive in arbitrary order; insert by ascending odometer so the
    // monotonicity check accepts every well-formed entry.
    let mut fuel_entries = payload.fuel_entries;
    fuel_entries.sort_by(|a, b| a.odometer.total_cmp(&b.odometer));

    for entry in fuel_entries {
        let Ok(date) = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d") else {
            summary
                .errors
                .push(format!("Failed to import fuel entry: bad date {}", entry.date));
            continue;
        };
        let date = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default());

        let price = if entry.total_cost > 0.0 {
            entry.total_cost
        } else {
            entry.cost_per_unit * entry.gallons
        };

        match engine
            .new_fuel_entry(
                vehicle_id,
                &user.username,
                date,
                entry.gallons,
                price,
                entry.odometer,
                None,
                None,
                now,
            )
            .await
        {
            Ok(_) => summary.fuel += 1,
            Err(err) => summary
                .errors
                .push(format!("Failed to import fuel entry: {err}")),
        }
    }

    Ok(Json(summary))
}
