//! Recurring maintenance reminders.
//!
//! A reminder fires on distance traveled, elapsed calendar time, or both.
//! An interval of 0 disables that dimension; with both at 0 the reminder
//! never alerts. Classification lives in [`crate::alerts`].

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub name: String,
    /// Distance between services; 0 disables the mileage dimension.
    pub interval_miles: f64,
    /// Days between services; 0 disables the calendar dimension.
    pub interval_days: i64,
    pub last_service_date: DateTime<Utc>,
    pub last_service_miles: f64,
}

impl Reminder {
    pub fn new(
        vehicle_id: Uuid,
        name: String,
        interval_miles: f64,
        interval_days: i64,
        last_service_date: DateTime<Utc>,
        last_service_miles: f64,
    ) -> ResultEngine<Self> {
        if interval_miles < 0.0 {
            return Err(EngineError::InvalidAmount(
                "interval_miles must be >= 0".to_string(),
            ));
        }
        if interval_days < 0 {
            return Err(EngineError::InvalidAmount(
                "interval_days must be >= 0".to_string(),
            ));
        }
        if last_service_miles < 0.0 {
            return Err(EngineError::InvalidAmount(
                "last_service_miles must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            vehicle_id,
            name,
            interval_miles,
            interval_days,
            last_service_date,
            last_service_miles,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_reminders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub vehicle_id: String,
    pub name: String,
    pub interval_miles: f64,
    pub interval_days: i64,
    pub last_service_date: DateTimeUtc,
    pub last_service_miles: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Reminder> for ActiveModel {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: ActiveValue::Set(reminder.id.to_string()),
            vehicle_id: ActiveValue::Set(reminder.vehicle_id.to_string()),
            name: ActiveValue::Set(reminder.name.clone()),
            interval_miles: ActiveValue::Set(reminder.interval_miles),
            interval_days: ActiveValue::Set(reminder.interval_days),
            last_service_date: ActiveValue::Set(reminder.last_service_date),
            last_service_miles: ActiveValue::Set(reminder.last_service_miles),
        }
    }
}

impl TryFrom<Model> for Reminder {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("reminder not exists".to_string()))?,
            vehicle_id: Uuid::parse_str(&model.vehicle_id)
                .map_err(|_| EngineError::KeyNotFound("vehicle not exists".to_string()))?,
            name: model.name,
            interval_miles: model.interval_miles,
            interval_days: model.interval_days,
            last_service_date: model.last_service_date,
            last_service_miles: model.last_service_miles,
        })
    }
}

/// Partial update applied by [`crate::Engine::update_reminder`]; absent
/// fields keep their current value.
#[derive(Clone, Debug, Default)]
pub struct ReminderChanges {
    pub name: Option<String>,
    pub interval_miles: Option<f64>,
    pub interval_days: Option<i64>,
    pub last_service_date: Option<DateTime<Utc>>,
    pub last_service_miles: Option<f64>,
}
