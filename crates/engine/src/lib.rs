//! Tagliando engine: vehicle ownership cost and maintenance state.
//!
//! The pure computation core lives in [`alerts`], [`stats`] and [`report`]:
//! snapshot in, plain data out, no I/O. [`Engine`] is the persistence-facing
//! wrapper around it: vehicles (with their reminders and share grants) are
//! cached in memory and loaded once at startup by [`EngineBuilder`]; fuel
//! entries, expenses and notifications are read from the database per
//! request. Mutating operations persist first and only then touch the
//! in-memory state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

pub use alerts::{AlertStatus, FleetAlert, ReminderAlert};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseChanges};
pub use fuel::{FuelEntry, FuelEntryChanges};
pub use notifications::{Notification, NotificationKind, NotificationStatus, NotificationSummary};
pub use reminders::{Reminder, ReminderChanges};
pub use report::{
    ComparisonRow, ComparisonSort, FleetComparison, VehicleOverview, VehicleReport,
};
pub use stats::{CategoryTotal, ExpenseStats, ExpenseTrendPoint, FuelStats, FuelTrendPoint};
pub use units::MileageUnit;
pub use vehicles::{Vehicle, VehicleChanges, VehicleSummary};

pub mod alerts;
mod error;
mod expenses;
mod fuel;
mod notifications;
mod reminders;
pub mod report;
mod shares;
pub mod stats;
mod units;
mod vehicles;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine {
    vehicles: HashMap<Uuid, Vehicle>,
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Return a vehicle the user owns or was granted access to.
    ///
    /// Inaccessible and missing vehicles are indistinguishable from the
    /// caller's side, so existence is never leaked.
    pub fn vehicle(&self, vehicle_id: Uuid, user_id: &str) -> ResultEngine<&Vehicle> {
        match self.vehicles.get(&vehicle_id) {
            Some(vehicle) if vehicle.accessible_by(user_id) => Ok(vehicle),
            _ => Err(EngineError::KeyNotFound("vehicle not exists".to_string())),
        }
    }

    fn vehicle_mut(&mut self, vehicle_id: Uuid, user_id: &str) -> ResultEngine<&mut Vehicle> {
        match self.vehicles.get_mut(&vehicle_id) {
            Some(vehicle) if vehicle.accessible_by(user_id) => Ok(vehicle),
            _ => Err(EngineError::KeyNotFound("vehicle not exists".to_string())),
        }
    }

    /// All vehicles the user owns or shares, sorted by display name.
    pub fn vehicles_for(&self, user_id: &str) -> Vec<&Vehicle> {
        let mut list: Vec<&Vehicle> = self
            .vehicles
            .values()
            .filter(|vehicle| vehicle.accessible_by(user_id))
            .collect();
        list.sort_by(|a, b| {
            a.display_name()
                .cmp(&b.display_name())
                .then_with(|| a.id.cmp(&b.id))
        });
        list
    }

    /// Add a new vehicle owned by `user_id`.
    pub async fn new_vehicle(
        &mut self,
        user_id: &str,
        make: String,
        model: String,
        year: i32,
        odometer: f64,
        mileage_unit: MileageUnit,
        fuel_type: String,
    ) -> ResultEngine<Uuid> {
        if odometer < 0.0 {
            return Err(EngineError::InvalidAmount(
                "odometer must be >= 0".to_string(),
            ));
        }

        let vehicle = Vehicle::new(user_id, make, model, year, odometer, mileage_unit, fuel_type);
        let vehicle_id = vehicle.id;
        let vehicle_model: vehicles::ActiveModel = (&vehicle).into();
        vehicle_model.insert(&self.database).await?;
        self.vehicles.insert(vehicle_id, vehicle);
        Ok(vehicle_id)
    }

    /// Apply a partial update to a vehicle. The odometer may only move
    /// forward; a lower value is an [`EngineError::OdometerRegression`].
    pub async fn update_vehicle(
        &mut self,
        vehicle_id: Uuid,
        user_id: &str,
        changes: VehicleChanges,
    ) -> ResultEngine<()> {
        {
            let vehicle = self.vehicle(vehicle_id, user_id)?;
            if let Some(odometer) = changes.odometer
                && odometer < vehicle.odometer
            {
                return Err(EngineError::OdometerRegression(format!(
                    "odometer {} is below the current reading {}",
                    odometer, vehicle.odometer
                )));
            }
        }

        let mut active = vehicles::ActiveModel {
            id: ActiveValue::Set(vehicle_id.to_string()),
            ..Default::default()
        };
        if let Some(make) = &changes.make {
            active.make = ActiveValue::Set(make.clone());
        }
        if let Some(model) = &changes.model {
            active.model = ActiveValue::Set(model.clone());
        }
        if let Some(year) = changes.year {
            active.year = ActiveValue::Set(year);
        }
        if let Some(odometer) = changes.odometer {
            active.odometer = ActiveValue::Set(odometer);
        }
        if let Some(unit) = changes.mileage_unit {
            active.mileage_unit = ActiveValue::Set(unit.code().to_string());
        }
        if let Some(fuel_type) = &changes.fuel_type {
            active.fuel_type = ActiveValue::Set(fuel_type.clone());
        }
        active.update(&self.database).await?;

        let vehicle = self.vehicle_mut(vehicle_id, user_id)?;
        if let Some(make) = changes.make {
            vehicle.make = make;
        }
        if let Some(model) = changes.model {
            vehicle.model = model;
        }
        if let Some(year) = changes.year {
            vehicle.year = year;
        }
        if let Some(odometer) = changes.odometer {
            vehicle.odometer = odometer;
        }
        if let Some(unit) = changes.mileage_unit {
            vehicle.mileage_unit = unit;
        }
        if let Some(fuel_type) = changes.fuel_type {
            vehicle.fuel_type = fuel_type;
        }
        Ok(())
    }

    /// Delete a vehicle and, via the schema's cascades, all of its records.
    /// Owner only.
    pub async fn delete_vehicle(&mut self, vehicle_id: Uuid, user_id: &str) -> ResultEngine<()> {
        {
            let vehicle = self.vehicle(vehicle_id, user_id)?;
            if vehicle.user_id != user_id {
                return Err(EngineError::Forbidden(
                    "only the owner can delete a vehicle".to_string(),
                ));
            }
        }
        vehicles::Entity::delete_by_id(vehicle_id.to_string())
            .exec(&self.database)
            .await?;
        self.vehicles.remove(&vehicle_id);
        Ok(())
    }

    /// Grant another user access to a vehicle. Owner only.
    pub async fn share_vehicle(
        &mut self,
        vehicle_id: Uuid,
        user_id: &str,
        username: &str,
    ) -> ResultEngine<()> {
        {
            let vehicle = self.vehicle(vehicle_id, user_id)?;
            if vehicle.user_id != user_id {
                return Err(EngineError::Forbidden(
                    "only the owner can share a vehicle".to_string(),
                ));
            }
            if username == vehicle.user_id || vehicle.shared_with.contains(username) {
                return Err(EngineError::ExistingKey(username.to_string()));
            }
        }

        let share = shares::ActiveModel {
            vehicle_id: ActiveValue::Set(vehicle_id.to_string()),
            user_id: ActiveValue::Set(username.to_string()),
        };
        share.insert(&self.database).await?;
        self.vehicle_mut(vehicle_id, user_id)?
            .shared_with
            .insert(username.to_string());
        Ok(())
    }

    /// Revoke a share grant. Owner only.
    pub async fn unshare_vehicle(
        &mut self,
        vehicle_id: Uuid,
        user_id: &str,
        username: &str,
    ) -> ResultEngine<()> {
        {
            let vehicle = self.vehicle(vehicle_id, user_id)?;
            if vehicle.user_id != user_id {
                return Err(EngineError::Forbidden(
                    "only the owner can manage shares".to_string(),
                ));
            }
            if !vehicle.shared_with.contains(username) {
                return Err(EngineError::KeyNotFound(username.to_string()));
            }
        }

        shares::Entity::delete_by_id((vehicle_id.to_string(), username.to_string()))
            .exec(&self.database)
            .await?;
        self.vehicle_mut(vehicle_id, user_id)?
            .shared_with
            .remove(username);
        Ok(())
    }

    /// Usernames a vehicle is shared with, sorted.
    pub fn shared_users(&self, vehicle_id: Uuid, user_id: &str) -> ResultEngine<Vec<String>> {
        let vehicle = self.vehicle(vehicle_id, user_id)?;
        let mut users: Vec<String> = vehicle.shared_with.iter().cloned().collect();
        users.sort();
        Ok(users)
    }

    /// Record a fill-up.
    ///
    /// Validates the entry, rejects odometer regressions against the highest
    /// recorded reading, bumps the vehicle odometer when the new reading is
    /// higher, and evaluates the vehicle's reminders against the new state.
    /// Alerts that fire are also stored as unread notifications for the
    /// acting user. Returns the entry together with the triggered alerts.
    pub async fn new_fuel_entry(
        &mut self,
        vehicle_id: Uuid,
        user_id: &str,
        date: DateTime<Utc>,
        gallons: f64,
        price: f64,
        odometer: f64,
        location: Option<String>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> ResultEngine<(FuelEntry, Vec<ReminderAlert>)> {
        let entry = FuelEntry::new(vehicle_id, date, gallons, price, odometer, location, notes)?;

        let alerts = {
            let vehicle = self.vehicle(vehicle_id, user_id)?;

            let last = fuel::Entity::find()
                .filter(fuel::Column::VehicleId.eq(vehicle_id.to_string()))
                .order_by_desc(fuel::Column::Odometer)
                .one(&self.database)
                .await?;
            if let Some(last) = last
                && entry.odometer < last.odometer
            {
                return Err(EngineError::OdometerRegression(format!(
                    "odometer {} is below the last recorded reading {}",
                    entry.odometer, last.odometer
                )));
            }

            let new_odometer = entry.odometer.max(vehicle.odometer);
            let alerts = alerts::evaluate_all(vehicle.reminders.values(), new_odometer, now);

            let db_tx = self.database.begin().await?;
            fuel::ActiveModel::from(&entry).insert(&db_tx).await?;
            if new_odometer > vehicle.odometer {
                let vehicle_model = vehicles::ActiveModel {
                    id: ActiveValue::Set(vehicle_id.to_string()),
                    odometer: ActiveValue::Set(new_odometer),
                    ..Default::default()
                };
                vehicle_model.update(&db_tx).await?;
            }
            for alert in &alerts {
                if let Some(notification) = notifications::notification_for(user_id, alert, now) {
                    notifications::ActiveModel::from(&notification)
                        .insert(&db_tx)
                        .await?;
                }
            }
            db_tx.commit().await?;
            alerts
        };

        let vehicle = self.vehicle_mut(vehicle_id, user_id)?;
        if entry.odometer > vehicle.odometer {
            vehicle.odometer = entry.odometer;
        }
        Ok((entry, alerts))
    }

    /// A vehicle's fill-ups, newest first.
    pub async fn list_fuel_entries(
        &self,
        vehicle_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<FuelEntry>> {
        self.vehicle(vehicle_id, user_id)?;
        let models = fuel::Entity::find()
            .filter(fuel::Column::VehicleId.eq(vehicle_id.to_string()))
            .order_by_desc(fuel::Column::Date)
            .all(&self.database)
            .await?;
        models.into_iter().map(FuelEntry::try_from).collect()
    }

    /// Apply a partial update to a fill-up.
    pub async fn update_fuel_entry(
        &self,
        entry_id: Uuid,
        user_id: &str,
        changes: FuelEntryChanges,
    ) -> ResultEngine<()> {
        let model = fuel::Entity::find_by_id(entry_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("fuel entry not exists".to_string()))?;
        let vehicle_id = Uuid::parse_str(&model.vehicle_id)
            .map_err(|_| EngineError::KeyNotFound("vehicle not exists".to_string()))?;
        self.vehicle(vehicle_id, user_id)?;

        if let Some(gallons) = changes.gallons
            && gallons <= 0.0
        {
            return Err(EngineError::InvalidAmount(
                "gallons must be > 0".to_string(),
            ));
        }
        if let Some(price) = changes.price
            && price <= 0.0
        {
            return Err(EngineError::InvalidAmount("price must be > 0".to_string()));
        }
        if let Some(odometer) = changes.odometer
            && odometer <= 0.0
        {
            return Err(EngineError::InvalidAmount(
                "odometer must be > 0".to_string(),
            ));
        }

        let mut active = fuel::ActiveModel {
            id: ActiveValue::Set(entry_id.to_string()),
            ..Default::default()
        };
        if let Some(date) = changes.date {
            active.date = ActiveValue::Set(date);
        }
        if let Some(gallons) = changes.gallons {
            active.gallons = ActiveValue::Set(gallons);
        }
        if let Some(price) = changes.price {
            active.price = ActiveValue::Set(price);
        }
        if let Some(odometer) = changes.odometer {
            active.odometer = ActiveValue::Set(odometer);
        }
        if let Some(location) = changes.location {
            active.location = ActiveValue::Set(location);
        }
        if let Some(notes) = changes.notes {
            active.notes = ActiveValue::Set(notes);
        }
        active.update(&self.database).await?;
        Ok(())
    }

    pub async fn delete_fuel_entry(&self, entry_id: Uuid, user_id: &str) -> ResultEngine<()> {
        let model = fuel::Entity::find_by_id(entry_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("fuel entry not exists".to_string()))?;
        let vehicle_id = Uuid::parse_str(&model.vehicle_id)
            .map_err(|_| EngineError::KeyNotFound("vehicle not exists".to_string()))?;
        self.vehicle(vehicle_id, user_id)?;

        fuel::Entity::delete_by_id(entry_id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Record an expense.
    pub async fn new_expense(
        &self,
        vehicle_id: Uuid,
        user_id: &str,
        category: String,
        amount: f64,
        date: DateTime<Utc>,
        notes: Option<String>,
    ) -> ResultEngine<Uuid> {
        self.vehicle(vehicle_id, user_id)?;
        let expense = Expense::new(vehicle_id, category, amount, date, notes)?;
        let expense_id = expense.id;
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(expense_id)
    }

    /// A vehicle's expenses, newest first.
    pub async fn list_expenses(
        &self,
        vehicle_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Expense>> {
        self.vehicle(vehicle_id, user_id)?;
        let models = expenses::Entity::find()
            .filter(expenses::Column::VehicleId.eq(vehicle_id.to_string()))
            .order_by_desc(expenses::Column::Date)
            .all(&self.database)
            .await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    /// Apply a partial update to an expense.
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        user_id: &str,
        changes: ExpenseChanges,
    ) -> ResultEngine<()> {
        let model = expenses::Entity::find_by_id(expense_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        let vehicle_id = Uuid::parse_str(&model.vehicle_id)
            .map_err(|_| EngineError::KeyNotFound("vehicle not exists".to_string()))?;
        self.vehicle(vehicle_id, user_id)?;

        if let Some(amount) = changes.amount
            && amount <= 0.0
        {
            return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
        }
        if let Some(category) = &changes.category
            && category.trim().is_empty()
        {
            return Err(EngineError::InvalidAmount(
                "category must not be empty".to_string(),
            ));
        }

        let mut active = expenses::ActiveModel {
            id: ActiveValue::Set(expense_id.to_string()),
            ..Default::default()
        };
        if let Some(category) = changes.category {
            active.category = ActiveValue::Set(category);
        }
        if let Some(amount) = changes.amount {
            active.amount = ActiveValue::Set(amount);
        }
        if let Some(date) = changes.date {
            active.date = ActiveValue::Set(date);
        }
        if let Some(notes) = changes.notes {
            active.notes = ActiveValue::Set(notes);
        }
        active.update(&self.database).await?;
        Ok(())
    }

    pub async fn delete_expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<()> {
        let model = expenses::Entity::find_by_id(expense_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        let vehicle_id = Uuid::parse_str(&model.vehicle_id)
            .map_err(|_| EngineError::KeyNotFound("vehicle not exists".to_string()))?;
        self.vehicle(vehicle_id, user_id)?;

        expenses::Entity::delete_by_id(expense_id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Resolve the vehicle a reminder belongs to, with the same
    /// existence-hiding access check as [`Engine::vehicle`].
    fn reminder_vehicle(&self, reminder_id: Uuid, user_id: &str) -> ResultEngine<Uuid> {
        let vehicle_id = self
            .vehicles
            .values()
            .find(|vehicle| vehicle.reminders.contains_key(&reminder_id))
            .map(|vehicle| vehicle.id)
            .ok_or_else(|| EngineError::KeyNotFound("reminder not exists".to_string()))?;
        self.vehicle(vehicle_id, user_id)
            .map_err(|_| EngineError::KeyNotFound("reminder not exists".to_string()))?;
        Ok(vehicle_id)
    }

    /// Add a maintenance reminder to a vehicle.
    pub async fn new_reminder(
        &mut self,
        vehicle_id: Uuid,
        user_id: &str,
        name: String,
        interval_miles: f64,
        interval_days: i64,
        last_service_date: DateTime<Utc>,
        last_service_miles: f64,
    ) -> ResultEngine<Uuid> {
        self.vehicle(vehicle_id, user_id)?;
        let reminder = Reminder::new(
            vehicle_id,
            name,
            interval_miles,
            interval_days,
            last_service_date,
            last_service_miles,
        )?;
        let reminder_id = reminder.id;
        reminders::ActiveModel::from(&reminder)
            .insert(&self.database)
            .await?;
        self.vehicle_mut(vehicle_id, user_id)?
            .reminders
            .insert(reminder_id, reminder);
        Ok(reminder_id)
    }

    /// A vehicle's reminders, sorted by name.
    pub fn list_reminders(&self, vehicle_id: Uuid, user_id: &str) -> ResultEngine<Vec<Reminder>> {
        let vehicle = self.vehicle(vehicle_id, user_id)?;
        let mut reminders: Vec<Reminder> = vehicle.reminders.values().cloned().collect();
        reminders.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(reminders)
    }

    /// Apply a partial update to a reminder.
    pub async fn update_reminder(
        &mut self,
        reminder_id: Uuid,
        user_id: &str,
        changes: ReminderChanges,
    ) -> ResultEngine<()> {
        let vehicle_id = self.reminder_vehicle(reminder_id, user_id)?;

        if let Some(interval_miles) = changes.interval_miles
            && interval_miles < 0.0
        {
            return Err(EngineError::InvalidAmount(
                "interval_miles must be >= 0".to_string(),
            ));
        }
        if let Some(interval_days) = changes.interval_days
            && interval_days < 0
        {
            return Err(EngineError::InvalidAmount(
                "interval_days must be >= 0".to_string(),
            ));
        }
        if let Some(last_service_miles) = changes.last_service_miles
            && last_service_miles < 0.0
        {
            return Err(EngineError::InvalidAmount(
                "last_service_miles must be >= 0".to_string(),
            ));
        }

        let mut active = reminders::ActiveModel {
            id: ActiveValue::Set(reminder_id.to_string()),
            ..Default::default()
        };
        if let Some(name) = &changes.name {
            active.name = ActiveValue::Set(name.clone());
        }
        if let Some(interval_miles) = changes.interval_miles {
            active.interval_miles = ActiveValue::Set(interval_miles);
        }
        if let Some(interval_days) = changes.interval_days {
            active.interval_days = ActiveValue::Set(interval_days);
        }
        if let Some(last_service_date) = changes.last_service_date {
            active.last_service_date = ActiveValue::Set(last_service_date);
        }
        if let Some(last_service_miles) = changes.last_service_miles {
            active.last_service_miles = ActiveValue::Set(last_service_miles);
        }
        active.update(&self.database).await?;

        let vehicle = self.vehicle_mut(vehicle_id, user_id)?;
        let reminder = vehicle
            .reminders
            .get_mut(&reminder_id)
            .ok_or_else(|| EngineError::KeyNotFound("reminder not exists".to_string()))?;
        if let Some(name) = changes.name {
            reminder.name = name;
        }
        if let Some(interval_miles) = changes.interval_miles {
            reminder.interval_miles = interval_miles;
        }
        if let Some(interval_days) = changes.interval_days {
            reminder.interval_days = interval_days;
        }
        if let Some(last_service_date) = changes.last_service_date {
            reminder.last_service_date = last_service_date;
        }
        if let Some(last_service_miles) = changes.last_service_miles {
            reminder.last_service_miles = last_service_miles;
        }
        Ok(())
    }

    pub async fn delete_reminder(&mut self, reminder_id: Uuid, user_id: &str) -> ResultEngine<()> {
        let vehicle_id = self.reminder_vehicle(reminder_id, user_id)?;
        reminders::Entity::delete_by_id(reminder_id.to_string())
            .exec(&self.database)
            .await?;
        self.vehicle_mut(vehicle_id, user_id)?
            .reminders
            .remove(&reminder_id);
        Ok(())
    }

    /// Mark a reminder as serviced: overwrites the last-service baselines
    /// with the caller-supplied values. No alert recomputation happens here.
    pub async fn complete_reminder(
        &mut self,
        reminder_id: Uuid,
        user_id: &str,
        service_date: DateTime<Utc>,
        service_miles: f64,
    ) -> ResultEngine<()> {
        if service_miles < 0.0 {
            return Err(EngineError::InvalidAmount(
                "service_miles must be >= 0".to_string(),
            ));
        }
        let vehicle_id = self.reminder_vehicle(reminder_id, user_id)?;

        let active = reminders::ActiveModel {
            id: ActiveValue::Set(reminder_id.to_string()),
            last_service_date: ActiveValue::Set(service_date),
            last_service_miles: ActiveValue::Set(service_miles),
            ..Default::default()
        };
        active.update(&self.database).await?;

        let vehicle = self.vehicle_mut(vehicle_id, user_id)?;
        if let Some(reminder) = vehicle.reminders.get_mut(&reminder_id) {
            reminder.last_service_date = service_date;
            reminder.last_service_miles = service_miles;
        }
        Ok(())
    }

    /// Actionable alerts for one vehicle at `now`.
    pub fn reminder_alerts(
        &self,
        vehicle_id: Uuid,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<ReminderAlert>> {
        let vehicle = self.vehicle(vehicle_id, user_id)?;
        Ok(alerts::evaluate_all(
            vehicle.reminders.values(),
            vehicle.odometer,
            now,
        ))
    }

    /// Actionable alerts across every accessible vehicle, evaluated against
    /// the one timestamp the caller supplies.
    pub fn fleet_alerts(&self, user_id: &str, now: DateTime<Utc>) -> Vec<FleetAlert> {
        let mut out = Vec::new();
        for vehicle in self.vehicles_for(user_id) {
            for alert in alerts::evaluate_all(vehicle.reminders.values(), vehicle.odometer, now) {
                out.push(FleetAlert {
                    vehicle_name: vehicle.display_name(),
                    alert,
                });
            }
        }
        out
    }

    async fn fuel_entries_snapshot(&self, vehicle_id: Uuid) -> ResultEngine<Vec<FuelEntry>> {
        let models = fuel::Entity::find()
            .filter(fuel::Column::VehicleId.eq(vehicle_id.to_string()))
            .all(&self.database)
            .await?;
        models.into_iter().map(FuelEntry::try_from).collect()
    }

    async fn expenses_snapshot(&self, vehicle_id: Uuid) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::VehicleId.eq(vehicle_id.to_string()))
            .all(&self.database)
            .await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    /// Lifetime fuel statistics for one vehicle.
    pub async fn fuel_statistics(
        &self,
        vehicle_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<FuelStats> {
        self.vehicle(vehicle_id, user_id)?;
        let entries = self.fuel_entries_snapshot(vehicle_id).await?;
        Ok(stats::fuel_stats(&entries))
    }

    /// Lifetime expense statistics for one vehicle.
    pub async fn expense_statistics(
        &self,
        vehicle_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<ExpenseStats> {
        self.vehicle(vehicle_id, user_id)?;
        let expenses = self.expenses_snapshot(vehicle_id).await?;
        Ok(stats::expense_stats(&expenses))
    }

    /// Detailed report for one vehicle: statistics plus current alerts.
    pub async fn vehicle_report(
        &self,
        vehicle_id: Uuid,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<VehicleReport> {
        let vehicle = self.vehicle(vehicle_id, user_id)?;
        let summary = vehicle.summary();
        let alerts = alerts::evaluate_all(vehicle.reminders.values(), vehicle.odometer, now);

        let entries = self.fuel_entries_snapshot(vehicle_id).await?;
        let expenses = self.expenses_snapshot(vehicle_id).await?;
        Ok(report::vehicle_report(
            summary,
            stats::fuel_stats(&entries),
            stats::expense_stats(&expenses),
            alerts,
        ))
    }

    /// The vehicle list enriched with lifetime totals and the count of
    /// currently due reminders, one consistent `now` across the fleet.
    pub async fn fleet_overview(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<VehicleOverview>> {
        let mut overviews = Vec::new();
        for vehicle in self.vehicles_for(user_id) {
            let entries = self.fuel_entries_snapshot(vehicle.id).await?;
            let expenses = self.expenses_snapshot(vehicle.id).await?;
            let alerts = alerts::evaluate_all(vehicle.reminders.values(), vehicle.odometer, now);
            overviews.push(report::vehicle_overview(
                vehicle.summary(),
                &stats::fuel_stats(&entries),
                &stats::expense_stats(&expenses),
                &alerts,
            ));
        }
        Ok(overviews)
    }

    /// Fleet comparison across every accessible vehicle.
    pub async fn fleet_comparison(
        &self,
        user_id: &str,
        sort: ComparisonSort,
    ) -> ResultEngine<FleetComparison> {
        let mut rows = Vec::new();
        for vehicle in self.vehicles_for(user_id) {
            let entries = self.fuel_entries_snapshot(vehicle.id).await?;
            let expenses = self.expenses_snapshot(vehicle.id).await?;
            rows.push(report::comparison_row(
                vehicle.summary(),
                &stats::fuel_stats(&entries),
                &stats::expense_stats(&expenses),
            ));
        }
        Ok(report::fleet_comparison(rows, sort))
    }

    /// Unread notifications for a user, newest first.
    pub async fn unread_notifications(&self, user_id: &str) -> ResultEngine<Vec<Notification>> {
        let models = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::Status.eq(NotificationStatus::Unread.as_str()))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Notification::try_from).collect()
    }

    pub async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        let model = notifications::Entity::find_by_id(notification_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("notification not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound(
                "notification not exists".to_string(),
            ));
        }

        let active = notifications::ActiveModel {
            id: ActiveValue::Set(notification_id.to_string()),
            status: ActiveValue::Set(NotificationStatus::Read.as_str().to_string()),
            ..Default::default()
        };
        active.update(&self.database).await?;
        Ok(())
    }

    pub async fn dismiss_notification(
        &self,
        notification_id: Uuid,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let model = notifications::Entity::find_by_id(notification_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("notification not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound(
                "notification not exists".to_string(),
            ));
        }

        let active = notifications::ActiveModel {
            id: ActiveValue::Set(notification_id.to_string()),
            status: ActiveValue::Set(NotificationStatus::Dismissed.as_str().to_string()),
            dismissed_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        active.update(&self.database).await?;
        Ok(())
    }

    /// Badge counts for the notification UI.
    pub async fn notification_summary(&self, user_id: &str) -> ResultEngine<NotificationSummary> {
        let unread_count = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::Status.eq(NotificationStatus::Unread.as_str()))
            .count(&self.database)
            .await?;
        let overdue_count = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::Status.ne(NotificationStatus::Dismissed.as_str()))
            .filter(notifications::Column::Kind.eq(NotificationKind::ReminderOverdue.as_str()))
            .count(&self.database)
            .await?;
        let upcoming_count = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::Status.ne(NotificationStatus::Dismissed.as_str()))
            .filter(notifications::Column::Kind.eq(NotificationKind::ReminderDue.as_str()))
            .count(&self.database)
            .await?;

        Ok(NotificationSummary {
            unread_count,
            overdue_count,
            upcoming_count,
        })
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`, loading every vehicle with its reminders and
    /// share grants into memory.
    pub async fn build(self) -> ResultEngine<Engine> {
        let mut loaded = HashMap::new();

        let vehicle_models = vehicles::Entity::find().all(&self.database).await?;
        for vehicle_model in vehicle_models {
            let mut vehicle = Vehicle::try_from(vehicle_model)?;

            let reminder_models = reminders::Entity::find()
                .filter(reminders::Column::VehicleId.eq(vehicle.id.to_string()))
                .all(&self.database)
                .await?;
            for reminder_model in reminder_models {
                let reminder = Reminder::try_from(reminder_model)?;
                vehicle.reminders.insert(reminder.id, reminder);
            }

            let share_models = shares::Entity::find()
                .filter(shares::Column::VehicleId.eq(vehicle.id.to_string()))
                .all(&self.database)
                .await?;
            for share_model in share_models {
                vehicle.shared_with.insert(share_model.user_id);
            }

            loaded.insert(vehicle.id, vehicle);
        }

        tracing::debug!("engine loaded {} vehicles", loaded.len());
        Ok(Engine {
            vehicles: loaded,
            database: self.database,
        })
    }
}
