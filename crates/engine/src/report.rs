//! Report composition: merges the aggregators' outputs into per-vehicle and
//! fleet-wide views. Nothing here computes beyond sums, ratios already
//! guarded in [`crate::stats`], and a deterministic sort.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    alerts::ReminderAlert,
    stats::{ExpenseStats, FuelStats},
    vehicles::VehicleSummary,
};

/// Detailed report for one vehicle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleReport {
    pub vehicle: VehicleSummary,
    pub fuel: FuelStats,
    pub expenses: ExpenseStats,
    /// Actionable reminders at report time.
    pub alerts: Vec<ReminderAlert>,
    /// Fuel plus expenses.
    pub total_cost: f64,
}

#[must_use]
pub fn vehicle_report(
    vehicle: VehicleSummary,
    fuel: FuelStats,
    expenses: ExpenseStats,
    alerts: Vec<ReminderAlert>,
) -> VehicleReport {
    let total_cost = fuel.total_cost + expenses.total_cost;
    VehicleReport {
        vehicle,
        fuel,
        expenses,
        alerts,
        total_cost,
    }
}

/// One row of the vehicle list, enriched with lifetime totals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleOverview {
    pub vehicle: VehicleSummary,
    pub total_cost: f64,
    pub total_miles: f64,
    pub average_mpg: f64,
    pub fuel_count: u64,
    pub expense_count: u64,
    pub last_fuel_date: Option<DateTime<Utc>>,
    /// Count of reminders currently `soon` or `overdue`.
    pub due_reminders: u64,
}

#[must_use]
pub fn vehicle_overview(
    vehicle: VehicleSummary,
    fuel: &FuelStats,
    expenses: &ExpenseStats,
    alerts: &[ReminderAlert],
) -> VehicleOverview {
    VehicleOverview {
        total_cost: fuel.total_cost + expenses.total_cost,
        total_miles: fuel.total_distance,
        average_mpg: fuel.average_mpg,
        fuel_count: fuel.entry_count,
        expense_count: expenses.expense_count,
        last_fuel_date: fuel.last_fillup.as_ref().map(|entry| entry.date),
        due_reminders: alerts.len() as u64,
        vehicle,
    }
}

/// Key the fleet comparison is sorted by, always descending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonSort {
    #[default]
    TotalCost,
    TotalDistance,
    AverageMpg,
    CostPerMile,
}

/// One vehicle's column in the fleet comparison.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub vehicle: VehicleSummary,
    pub total_cost: f64,
    pub total_distance: f64,
    pub average_mpg: f64,
    /// `total_cost / total_distance`, 0 when no distance was recorded.
    pub cost_per_mile: f64,
    pub fuel_count: u64,
    pub expense_count: u64,
}

#[must_use]
pub fn comparison_row(
    vehicle: VehicleSummary,
    fuel: &FuelStats,
    expenses: &ExpenseStats,
) -> ComparisonRow {
    let total_cost = fuel.total_cost + expenses.total_cost;
    let cost_per_mile = if fuel.total_distance > 0.0 {
        total_cost / fuel.total_distance
    } else {
        0.0
    };
    ComparisonRow {
        vehicle,
        total_cost,
        total_distance: fuel.total_distance,
        average_mpg: fuel.average_mpg,
        cost_per_mile,
        fuel_count: fuel.entry_count,
        expense_count: expenses.expense_count,
    }
}

/// Fleet-wide comparison: the rows sorted by the chosen key plus the grand
/// total across all vehicles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FleetComparison {
    pub vehicles: Vec<ComparisonRow>,
    pub total_cost: f64,
}

/// Sorts rows descending by the chosen key, ties broken by vehicle name then
/// id so equal-valued fleets still render in one fixed order.
#[must_use]
pub fn fleet_comparison(mut rows: Vec<ComparisonRow>, sort: ComparisonSort) -> FleetComparison {
    let key = |row: &ComparisonRow| match sort {
        ComparisonSort::TotalCost => row.total_cost,
        ComparisonSort::TotalDistance => row.total_distance,
        ComparisonSort::AverageMpg => row.average_mpg,
        ComparisonSort::CostPerMile => row.cost_per_mile,
    };
    rows.sort_by(|a, b| {
        key(b)
            .total_cmp(&key(a))
            .then_with(|| a.vehicle.name.cmp(&b.vehicle.name))
            .then_with(|| a.vehicle.id.cmp(&b.vehicle.id))
    });
    let total_cost = rows.iter().map(|row| row.total_cost).sum();
    FleetComparison {
        vehicles: rows,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::MileageUnit;

    fn summary(name: &str) -> VehicleSummary {
        VehicleSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            make: String::new(),
            model: String::new(),
            year: 2020,
            odometer: 0.0,
            mileage_unit: MileageUnit::Mi,
            fuel_type: "Petrol".to_string(),
        }
    }

    fn fuel(total_cost: f64, total_distance: f64, average_mpg: f64) -> FuelStats {
        FuelStats {
            total_cost,
            total_distance,
            average_mpg,
            ..FuelStats::default()
        }
    }

    fn expenses(total_cost: f64) -> ExpenseStats {
        ExpenseStats {
            total_cost,
            ..ExpenseStats::default()
        }
    }

    #[test]
    fn report_total_is_fuel_plus_expenses() {
        let report = vehicle_report(
            summary("2020 A B"),
            fuel(120.0, 900.0, 30.0),
            expenses(80.0),
            Vec::new(),
        );
        assert_eq!(report.total_cost, 200.0);
    }

    #[test]
    fn cost_per_mile_guards_zero_distance() {
        let row = comparison_row(summary("2020 A B"), &fuel(120.0, 0.0, 0.0), &expenses(0.0));
        assert_eq!(row.cost_per_mile, 0.0);

        let row = comparison_row(
            summary("2020 A B"),
            &fuel(120.0, 600.0, 30.0),
            &expenses(30.0),
        );
        assert!((row.cost_per_mile - 0.25).abs() < 1e-9);
    }

    #[test]
    fn comparison_sorts_descending_by_key() {
        let cheap = comparison_row(summary("2018 Cheap Car"), &fuel(50.0, 100.0, 20.0), &expenses(0.0));
        let costly = comparison_row(summary("2022 Costly Car"), &fuel(500.0, 100.0, 10.0), &expenses(0.0));

        let comparison = fleet_comparison(vec![cheap, costly], ComparisonSort::TotalCost);
        assert_eq!(comparison.vehicles[0].vehicle.name, "2022 Costly Car");
        assert_eq!(comparison.total_cost, 550.0);

        let cheap = comparison_row(summary("2018 Cheap Car"), &fuel(50.0, 100.0, 20.0), &expenses(0.0));
        let costly = comparison_row(summary("2022 Costly Car"), &fuel(500.0, 100.0, 10.0), &expenses(0.0));
        let comparison = fleet_comparison(vec![cheap, costly], ComparisonSort::AverageMpg);
        assert_eq!(comparison.vehicles[0].vehicle.name, "2018 Cheap Car");
    }

    #[test]
    fn comparison_ties_break_by_name() {
        let b = comparison_row(summary("2020 B Car"), &fuel(100.0, 0.0, 0.0), &expenses(0.0));
        let a = comparison_row(summary("2020 A Car"), &fuel(100.0, 0.0, 0.0), &expenses(0.0));

        let comparison = fleet_comparison(vec![b, a], ComparisonSort::TotalCost);
        let names: Vec<&str> = comparison
            .vehicles
            .iter()
            .map(|row| row.vehicle.name.as_str())
            .collect();
        assert_eq!(names, vec!["2020 A Car", "2020 B Car"]);
    }
}
