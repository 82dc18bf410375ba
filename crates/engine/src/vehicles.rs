//! The `Vehicle` aggregate: the odometer state plus the reminders and share
//! grants that are kept in memory. Fuel entries and expenses are read from
//! the database per request and never cached here.

use std::collections::{HashMap, HashSet};

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MileageUnit, reminders::Reminder};

#[derive(Clone, Debug)]
pub struct Vehicle {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    /// Owner username. Share grants live in `shared_with`.
    pub user_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Latest known odometer reading; bumped whenever a fill-up reports a
    /// higher value. Never decreases.
    pub odometer: f64,
    pub mileage_unit: MileageUnit,
    pub fuel_type: String,
    pub reminders: HashMap<Uuid, Reminder>,
    pub shared_with: HashSet<String>,
}

impl Vehicle {
    pub fn new(
        user_id: &str,
        make: String,
        model: String,
        year: i32,
        odometer: f64,
        mileage_unit: MileageUnit,
        fuel_type: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            make,
            model,
            year,
            odometer,
            mileage_unit,
            fuel_type,
            reminders: HashMap::new(),
            shared_with: HashSet::new(),
        }
    }

    /// Display name, e.g. "2015 Mazda 3".
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }

    /// `true` for the owner and anyone the vehicle was shared with.
    #[must_use]
    pub fn accessible_by(&self, user_id: &str) -> bool {
        self.user_id == user_id || self.shared_with.contains(user_id)
    }

    /// Plain serializable snapshot for reports and API responses.
    #[must_use]
    pub fn summary(&self) -> VehicleSummary {
        VehicleSummary {
            id: self.id,
            name: self.display_name(),
            make: self.make.clone(),
            model: self.model.clone(),
            year: self.year,
            odometer: self.odometer,
            mileage_unit: self.mileage_unit,
            fuel_type: self.fuel_type.clone(),
        }
    }
}

/// Flat, behavior-free vehicle snapshot embedded in derived outputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub id: Uuid,
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub odometer: f64,
    pub mileage_unit: MileageUnit,
    pub fuel_type: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub odometer: f64,
    pub mileage_unit: String,
    pub fuel_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Vehicle> for ActiveModel {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: ActiveValue::Set(vehicle.id.to_string()),
            user_id: ActiveValue::Set(vehicle.user_id.clone()),
            make: ActiveValue::Set(vehicle.make.clone()),
            model: ActiveValue::Set(vehicle.model.clone()),
            year: ActiveValue::Set(vehicle.year),
            odometer: ActiveValue::Set(vehicle.odometer),
            mileage_unit: ActiveValue::Set(vehicle.mileage_unit.code().to_string()),
            fuel_type: ActiveValue::Set(vehicle.fuel_type.clone()),
        }
    }
}

impl TryFrom<Model> for Vehicle {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("vehicle not exists".to_string()))?,
            user_id: model.user_id,
            make: model.make,
            model: model.model,
            year: model.year,
            odometer: model.odometer,
            mileage_unit: MileageUnit::try_from(model.mileage_unit.as_str()).unwrap_or_default(),
            fuel_type: model.fuel_type,
            reminders: HashMap::new(),
            shared_with: HashSet::new(),
        })
    }
}

/// Partial update applied by [`crate::Engine::update_vehicle`].
#[derive(Clone, Debug, Default)]
pub struct VehicleChanges {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub odometer: Option<f64>,
    pub mileage_unit: Option<MileageUnit>,
    pub fuel_type: Option<String>,
}
