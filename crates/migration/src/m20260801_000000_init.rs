//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication and display preferences
//! - `vehicles`: the tracked vehicles, owned by users
//! - `vehicle_shares`: multi-user vehicle access
//! - `fuel_entries`: fill-up records
//! - `expenses`: ad-hoc costs (insurance, parking, repairs)
//! - `maintenance_reminders`: recurring service triggers
//! - `notifications`: stored reminder alerts with a read/dismiss lifecycle

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    Name,
    Currency,
    Units,
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Id,
    UserId,
    Make,
    Model,
    Year,
    Odometer,
    MileageUnit,
    FuelType,
}

#[derive(Iden)]
enum VehicleShares {
    Table,
    VehicleId,
    UserId,
}

#[derive(Iden)]
enum FuelEntries {
    Table,
    Id,
    VehicleId,
    Date,
    Gallons,
    Price,
    Odometer,
    Location,
    Notes,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    VehicleId,
    Category,
    Amount,
    Date,
    Notes,
}

#[derive(Iden)]
enum MaintenanceReminders {
    Table,
    Id,
    VehicleId,
    Name,
    IntervalMiles,
    IntervalDays,
    LastServiceDate,
    LastServiceMiles,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    UserId,
    VehicleId,
    ReminderId,
    Kind,
    Title,
    Message,
    Status,
    CreatedAt,
    DismissedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Name)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Users::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(Users::Units)
                            .string()
                            .not_null()
                            .default("mi"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Vehicles
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::UserId).string().not_null())
                    .col(ColumnDef::new(Vehicles::Make).string().not_null())
                    .col(ColumnDef::new(Vehicles::Model).string().not_null())
                    .col(ColumnDef::new(Vehicles::Year).integer().not_null())
                    .col(
                        ColumnDef::new(Vehicles::Odometer)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Vehicles::MileageUnit)
                            .string()
                            .not_null()
                            .default("mi"),
                    )
                    .col(
                        ColumnDef::new(Vehicles::FuelType)
                            .string()
                            .not_null()
                            .default("Petrol"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vehicles-user_id")
                            .from(Vehicles::Table, Vehicles::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-vehicles-user_id")
                    .table(Vehicles::Table)
                    .col(Vehicles::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Vehicle Shares
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(VehicleShares::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VehicleShares::VehicleId).string().not_null())
                    .col(ColumnDef::new(VehicleShares::UserId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(VehicleShares::VehicleId)
                            .col(VehicleShares::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vehicle_shares-vehicle_id")
                            .from(VehicleShares::Table, VehicleShares::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vehicle_shares-user_id")
                            .from(VehicleShares::Table, VehicleShares::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-vehicle_shares-user_id")
                    .table(VehicleShares::Table)
                    .col(VehicleShares::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Fuel Entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FuelEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FuelEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FuelEntries::VehicleId).string().not_null())
                    .col(ColumnDef::new(FuelEntries::Date).timestamp().not_null())
                    .col(ColumnDef::new(FuelEntries::Gallons).double().not_null())
                    .col(ColumnDef::new(FuelEntries::Price).double().not_null())
                    .col(ColumnDef::new(FuelEntries::Odometer).double().not_null())
                    .col(
                        ColumnDef::new(FuelEntries::Location)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(FuelEntries::Notes)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fuel_entries-vehicle_id")
                            .from(FuelEntries::Table, FuelEntries::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fuel_entries-vehicle_id-date")
                    .table(FuelEntries::Table)
                    .col(FuelEntries::VehicleId)
                    .col(FuelEntries::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fuel_entries-vehicle_id-odometer")
                    .table(FuelEntries::Table)
                    .col(FuelEntries::VehicleId)
                    .col(FuelEntries::Odometer)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::VehicleId).string().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Amount).double().not_null())
                    .col(ColumnDef::new(Expenses::Date).timestamp().not_null())
                    .col(
                        ColumnDef::new(Expenses::Notes)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-vehicle_id")
                            .from(Expenses::Table, Expenses::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-vehicle_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::VehicleId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Maintenance Reminders
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceReminders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceReminders::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReminders::VehicleId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReminders::Name)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReminders::IntervalMiles)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReminders::IntervalDays)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReminders::LastServiceDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceReminders::LastServiceMiles)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-maintenance_reminders-vehicle_id")
                            .from(MaintenanceReminders::Table, MaintenanceReminders::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-maintenance_reminders-vehicle_id")
                    .table(MaintenanceReminders::Table)
                    .col(MaintenanceReminders::VehicleId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Notifications
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).string().not_null())
                    .col(ColumnDef::new(Notifications::VehicleId).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::ReminderId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::Status)
                            .string()
                            .not_null()
                            .default("unread"),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::DismissedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-user_id")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-vehicle_id")
                            .from(Notifications::Table, Notifications::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-notifications-user_id-status")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MaintenanceReminders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FuelEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VehicleShares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
