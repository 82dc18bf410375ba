//! Fuel fill-up records.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// One fill-up. `price` is the total cost of the fill-up, not per unit.
///
/// Entries are meaningfully ordered both by `date` and by `odometer`; for a
/// well-formed vehicle the two orderings agree, and the engine rejects new
/// entries whose odometer is below the highest recorded one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelEntry {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: DateTime<Utc>,
    pub gallons: f64,
    pub price: f64,
    pub odometer: f64,
    pub location: String,
    pub notes: String,
}

impl FuelEntry {
    pub fn new(
        vehicle_id: Uuid,
        date: DateTime<Utc>,
        gallons: f64,
        price: f64,
        odometer: f64,
        location: Option<String>,
        notes: Option<String>,
    ) -> ResultEngine<Self> {
        if gallons <= 0.0 {
            return Err(EngineError::InvalidAmount(
                "gallons must be > 0".to_string(),
            ));
        }
        if price <= 0.0 {
            return Err(EngineError::InvalidAmount("price must be > 0".to_string()));
        }
        if odometer <= 0.0 {
            return Err(EngineError::InvalidAmount(
                "odometer must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            vehicle_id,
            date,
            gallons,
            price,
            odometer,
            location: location.unwrap_or_default(),
            notes: notes.unwrap_or_default(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fuel_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub vehicle_id: String,
    pub date: DateTimeUtc,
    pub gallons: f64,
    pub price: f64,
    pub odometer: f64,
    pub location: String,
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FuelEntry> for ActiveModel {
    fn from(entry: &FuelEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            vehicle_id: ActiveValue::Set(entry.vehicle_id.to_string()),
            date: ActiveValue::Set(entry.date),
            gallons: ActiveValue::Set(entry.gallons),
            price: ActiveValue::Set(entry.price),
            odometer: ActiveValue::Set(entry.odometer),
            location: ActiveValue::Set(entry.location.clone()),
            notes: ActiveValue::Set(entry.notes.clone()),
        }
    }
}

impl TryFrom<Model> for FuelEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("fuel entry not exists".to_string()))?,
            vehicle_id: Uuid::parse_str(&model.vehicle_id)
                .map_err(|_| EngineError::KeyNotFound("vehicle not exists".to_string()))?,
            date: model.date,
            gallons: model.gallons,
            price: model.price,
            odometer: model.odometer,
            location: model.location,
            notes: model.notes,
        })
    }
}

/// Partial update applied by [`crate::Engine::update_fuel_entry`].
#[derive(Clone, Debug, Default)]
pub struct FuelEntryChanges {
    pub date: Option<DateTime<Utc>>,
    pub gallons: Option<f64>,
    pub price: Option<f64>,
    pub odometer: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
}
