//! Ad-hoc vehicle expenses (insurance, parking, repairs, ...).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// A single expense. `category` is a free-form label; the aggregator matches
/// it exactly and case-sensitively, so "insurance" and "Insurance" are two
/// different categories.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub notes: String,
}

impl Expense {
    pub fn new(
        vehicle_id: Uuid,
        category: String,
        amount: f64,
        date: DateTime<Utc>,
        notes: Option<String>,
    ) -> ResultEngine<Self> {
        if amount <= 0.0 {
            return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
        }
        if category.trim().is_empty() {
            return Err(EngineError::InvalidAmount(
                "category must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            vehicle_id,
            category,
            amount,
            date,
            notes: notes.unwrap_or_default(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub vehicle_id: String,
    pub category: String,
    pub amount: f64,
    pub date: DateTimeUtc,
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            vehicle_id: ActiveValue::Set(expense.vehicle_id.to_string()),
            category: ActiveValue::Set(expense.category.clone()),
            amount: ActiveValue::Set(expense.amount),
            date: ActiveValue::Set(expense.date),
            notes: ActiveValue::Set(expense.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            vehicle_id: Uuid::parse_str(&model.vehicle_id)
                .map_err(|_| EngineError::KeyNotFound("vehicle not exists".to_string()))?,
            category: model.category,
            amount: model.amount,
            date: model.date,
            notes: model.notes,
        })
    }
}

/// Partial update applied by [`crate::Engine::update_expense`].
#[derive(Clone, Debug, Default)]
pub struct ExpenseChanges {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
