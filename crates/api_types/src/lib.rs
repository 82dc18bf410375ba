use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distance unit a vehicle's odometer is recorded in.
///
/// Serialized with the lowercase codes stored by the engine (`mi`, `km`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MileageUnit {
    #[default]
    Mi,
    Km,
}

pub mod vehicle {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleNew {
        pub make: String,
        pub model: String,
        pub year: i32,
        pub odometer: Option<f64>,
        pub mileage_unit: Option<MileageUnit>,
        pub fuel_type: Option<String>,
    }

    /// Partial update; absent fields are left unchanged.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleUpdate {
        pub make: Option<String>,
        pub model: Option<String>,
        pub year: Option<i32>,
        pub odometer: Option<f64>,
        pub mileage_unit: Option<MileageUnit>,
        pub fuel_type: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleView {
        pub id: Uuid,
        /// Display name, "{year} {make} {model}".
        pub name: String,
        pub make: String,
        pub model: String,
        pub year: i32,
        pub odometer: f64,
        pub mileage_unit: MileageUnit,
        pub fuel_type: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleCreated {
        pub id: Uuid,
    }

    /// One row of the vehicle list, enriched with lifetime totals.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleWithStats {
        pub vehicle: VehicleView,
        pub total_cost: f64,
        pub total_miles: f64,
        pub average_mpg: f64,
        pub fuel_count: u64,
        pub expense_count: u64,
        pub last_fuel_date: Option<DateTime<Utc>>,
        /// Reminders currently classified `soon` or `overdue`.
        pub due_reminders: u64,
    }

    /// Request body for granting another user access to a vehicle.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleShareNew {
        pub username: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SharedUsersResponse {
        pub users: Vec<String>,
    }
}

pub mod fuel {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelEntryNew {
        pub date: DateTime<Utc>,
        pub gallons: f64,
        /// Total cost of the fill-up, not price per unit.
        pub price: f64,
        pub odometer: f64,
        pub location: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelEntryUpdate {
        pub date: Option<DateTime<Utc>>,
        pub gallons: Option<f64>,
        pub price: Option<f64>,
        pub odometer: Option<f64>,
        pub location: Option<String>,
        pub notes: Option<String>,
    }

    /// Response for a created fill-up: the new entry id plus any reminder
    /// alerts the new odometer reading triggered.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelEntryCreated {
        pub id: Uuid,
        pub alerts: Vec<super::reminder::AlertView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub category: String,
        pub amount: f64,
        pub date: DateTime<Utc>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub category: Option<String>,
        pub amount: Option<f64>,
        pub date: Option<DateTime<Utc>>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }
}

pub mod reminder {
    use super::*;

    /// Alert tier for a maintenance reminder.
    ///
    /// The order is total: `overdue` beats `soon` beats `upcoming`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AlertStatus {
        Upcoming,
        Soon,
        Overdue,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderNew {
        pub name: String,
        /// 0 disables the mileage dimension.
        pub interval_miles: Option<f64>,
        /// 0 disables the calendar dimension.
        pub interval_days: Option<i64>,
        pub last_service_date: DateTime<Utc>,
        pub last_service_miles: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderUpdate {
        pub name: Option<String>,
        pub interval_miles: Option<f64>,
        pub interval_days: Option<i64>,
        pub last_service_date: Option<DateTime<Utc>>,
        pub last_service_miles: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderCreated {
        pub id: Uuid,
    }

    /// Marks a service as done, resetting the reminder's baselines.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderComplete {
        pub service_date: DateTime<Utc>,
        pub service_miles: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertView {
        pub vehicle_id: Uuid,
        pub reminder_id: Uuid,
        pub reminder_name: String,
        pub status: AlertStatus,
        /// Signed: negative once the mileage threshold is passed.
        pub miles_to_go: f64,
        /// Signed: negative once the service date is passed.
        pub days_until_due: i64,
    }

    /// An alert paired with the vehicle it belongs to, for fleet-wide lists.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FleetAlertView {
        pub vehicle_id: Uuid,
        pub vehicle_name: String,
        pub reminder_id: Uuid,
        pub reminder_name: String,
        pub status: AlertStatus,
        pub miles_to_go: f64,
        pub days_until_due: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertsResponse {
        pub alerts: Vec<FleetAlertView>,
    }
}

pub mod report {
    use super::*;

    /// Key the fleet comparison is sorted by (descending).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ComparisonSortKey {
        #[default]
        TotalCost,
        TotalDistance,
        AverageMpg,
        CostPerMile,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ComparisonQuery {
        pub sort: Option<ComparisonSortKey>,
    }
}

pub mod notification {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationSummary {
        pub unread_count: u64,
        pub overdue_count: u64,
        pub upcoming_count: u64,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub name: String,
        /// Display currency code (e.g. "USD"); informational only.
        pub currency: String,
        pub units: MileageUnit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub name: Option<String>,
        pub currency: Option<String>,
        pub units: Option<MileageUnit>,
    }
}

pub mod import {
    use super::*;

    /// Hammond JSON export. Fuel entries carry no vehicle reference; exports
    /// are per-vehicle, so entries attach to the first imported vehicle.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct HammondExport {
        pub vehicles: Vec<HammondVehicle>,
        #[serde(default)]
        pub fuel_entries: Vec<HammondFuelEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HammondVehicle {
        #[serde(default)]
        pub name: String,
        pub make: String,
        pub model: String,
        pub year: i32,
        #[serde(default)]
        pub odometer: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HammondFuelEntry {
        /// `YYYY-MM-DD`.
        pub date: String,
        pub odometer: f64,
        pub gallons: f64,
        #[serde(default)]
        pub cost_per_unit: f64,
        #[serde(default)]
        pub total_cost: f64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ImportSummary {
        pub vehicles: u64,
        pub fuel: u64,
        pub errors: Vec<String>,
    }
}
