use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{router, run, run_with_listener, spawn_with_listener};

mod expenses;
mod fuel;
mod imports;
mod notifications;
mod reminders;
mod reports;
mod server;
mod user;
mod vehicles;

pub mod types {
    pub mod vehicle {
        pub use api_types::vehicle::{VehicleNew, VehicleUpdate, VehicleView, VehicleWithStats};
        pub use engine::{Vehicle, VehicleSummary};
    }

    pub mod fuel {
        pub use api_types::fuel::{FuelEntryCreated, FuelEntryNew, FuelEntryUpdate};
        pub use engine::FuelEntry;
    }

    pub mod expense {
        pub use api_types::expense::{ExpenseCreated, ExpenseNew, ExpenseUpdate};
        pub use engine::Expense;
    }

    pub mod reminder {
        pub use api_types::reminder::{
            AlertStatus, AlertView, AlertsResponse, FleetAlertView, ReminderComplete, ReminderNew,
            ReminderUpdate,
        };
        pub use engine::Reminder;
    }

    pub mod report {
        pub use api_types::report::{ComparisonQuery, ComparisonSortKey};
        pub use engine::{FleetComparison, VehicleReport};
    }

    pub mod notification {
        pub use api_types::notification::NotificationSummary;
        pub use engine::Notification;
    }

    pub mod user {
        pub use api_types::user::{UserUpdate, UserView};
    }

    pub mod import {
        pub use api_types::import::{HammondExport, ImportSummary};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::OdometerRegression(_)
        | EngineError::InvalidUnit(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res =
            ServerError::from(EngineError::OdometerRegression("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
