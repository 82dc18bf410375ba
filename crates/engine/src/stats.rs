//! Cost and usage aggregation over fuel entries and expenses.
//!
//! Both aggregators are pure reductions over an input snapshot: no I/O, no
//! clock, no shared state. Empty input is a normal outcome and yields a
//! zero-valued summary. Month buckets and category maps are ordered
//! (`BTreeMap`), so two runs over the same snapshot always serialize
//! identically.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{expenses::Expense, fuel::FuelEntry};

/// Lifetime fuel summary for one vehicle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FuelStats {
    pub total_cost: f64,
    pub total_gallons: f64,
    /// Odometer span between the earliest and the latest entry.
    pub total_distance: f64,
    /// `total_distance / total_gallons`, 0 when there are no gallons.
    pub average_mpg: f64,
    pub entry_count: u64,
    pub last_fillup: Option<FuelEntry>,
    /// Ascending by month.
    pub monthly_trend: Vec<FuelTrendPoint>,
}

/// One calendar month of fuel activity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelTrendPoint {
    /// `YYYY-MM`.
    pub month: String,
    pub cost: f64,
    pub gallons: f64,
    /// Distance is derived from consecutive-entry odometer differences and
    /// attributed to the earlier entry's month, so the newest month of a
    /// series can show fuel bought but no distance yet.
    pub distance: f64,
    pub mpg: f64,
}

/// Lifetime expense summary for one vehicle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExpenseStats {
    pub total_cost: f64,
    pub expense_count: u64,
    /// Per-category running totals, keyed by the exact category label.
    pub categories: BTreeMap<String, CategoryTotal>,
    /// Ascending by month.
    pub monthly_trend: Vec<ExpenseTrendPoint>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub total: f64,
    pub count: u64,
}

/// One calendar month of expense activity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseTrendPoint {
    /// `YYYY-MM`.
    pub month: String,
    pub total: f64,
    pub categories: BTreeMap<String, f64>,
}

fn month_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m").to_string()
}

/// Reduces a vehicle's fill-ups, in any order, into a [`FuelStats`].
#[must_use]
pub fn fuel_stats(entries: &[FuelEntry]) -> FuelStats {
    let mut sorted: Vec<&FuelEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.odometer.total_cmp(&b.odometer))
    });

    let Some((first, last)) = sorted.first().zip(sorted.last()) else {
        return FuelStats::default();
    };

    let total_distance = last.odometer - first.odometer;
    let total_gallons: f64 = sorted.iter().map(|entry| entry.gallons).sum();
    let total_cost: f64 = sorted.iter().map(|entry| entry.price).sum();
    let average_mpg = if total_gallons > 0.0 {
        total_distance / total_gallons
    } else {
        0.0
    };
    let last_fillup = Some((*last).clone());

    let mut buckets: BTreeMap<String, FuelTrendPoint> = BTreeMap::new();
    for entry in &sorted {
        let point = buckets.entry(month_key(entry.date)).or_default();
        point.cost += entry.price;
        point.gallons += entry.gallons;
    }
    for pair in sorted.windows(2) {
        let point = buckets.entry(month_key(pair[0].date)).or_default();
        point.distance += pair[1].odometer - pair[0].odometer;
    }

    let monthly_trend = buckets
        .into_iter()
        .map(|(month, mut point)| {
            point.month = month;
            point.mpg = if point.gallons > 0.0 {
                point.distance / point.gallons
            } else {
                0.0
            };
            point
        })
        .collect();

    FuelStats {
        total_cost,
        total_gallons,
        total_distance,
        average_mpg,
        entry_count: entries.len() as u64,
        last_fillup,
        monthly_trend,
    }
}

/// Reduces a vehicle's expenses, in any order, into an [`ExpenseStats`].
#[must_use]
pub fn expense_stats(expenses: &[Expense]) -> ExpenseStats {
    let mut stats = ExpenseStats {
        expense_count: expenses.len() as u64,
        ..ExpenseStats::default()
    };
    let mut buckets: BTreeMap<String, ExpenseTrendPoint> = BTreeMap::new();

    for expense in expenses {
        stats.total_cost += expense.amount;

        let category = stats.categories.entry(expense.category.clone()).or_default();
        category.total += expense.amount;
        category.count += 1;

        let point = buckets.entry(month_key(expense.date)).or_default();
        point.total += expense.amount;
        *point.categories.entry(expense.category.clone()).or_default() += expense.amount;
    }

    stats.monthly_trend = buckets
        .into_iter()
        .map(|(month, mut point)| {
            point.month = month;
            point
        })
        .collect();

    stats
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn entry(date: (i32, u32, u32), odometer: f64, gallons: f64, price: f64) -> FuelEntry {
        FuelEntry {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::nil(),
            date: Utc
                .with_ymd_and_hms(date.0, date.1, date.2, 12, 0, 0)
                .unwrap(),
            gallons,
            price,
            odometer,
            location: String::new(),
            notes: String::new(),
        }
    }

    fn expense(date: (i32, u32, u32), category: &str, amount: f64) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::nil(),
            category: category.to_string(),
            amount,
            date: Utc
                .with_ymd_and_hms(date.0, date.1, date.2, 12, 0, 0)
                .unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn empty_fuel_is_all_zero_not_an_error() {
        let stats = fuel_stats(&[]);
        assert_eq!(stats.total_cost, 0.0);
        assert_eq!(stats.total_gallons, 0.0);
        assert_eq!(stats.total_distance, 0.0);
        assert_eq!(stats.average_mpg, 0.0);
        assert_eq!(stats.entry_count, 0);
        assert!(stats.last_fillup.is_none());
        assert!(stats.monthly_trend.is_empty());
    }

    #[test]
    fn single_entry_has_no_distance_and_no_nan() {
        let stats = fuel_stats(&[entry((2024, 1, 5), 1_000.0, 10.0, 30.0)]);
        assert_eq!(stats.total_distance, 0.0);
        assert_eq!(stats.total_gallons, 10.0);
        assert_eq!(stats.average_mpg, 0.0);
        assert_eq!(stats.monthly_trend.len(), 1);
        assert_eq!(stats.monthly_trend[0].distance, 0.0);
        assert_eq!(stats.monthly_trend[0].mpg, 0.0);
    }

    #[test]
    fn two_entry_scenario() {
        // Input deliberately unsorted; the aggregator must sort by date.
        let stats = fuel_stats(&[
            entry((2024, 2, 5), 1_400.0, 12.0, 36.0),
            entry((2024, 1, 5), 1_000.0, 10.0, 30.0),
        ]);

        assert_eq!(stats.total_distance, 400.0);
        assert_eq!(stats.total_gallons, 22.0);
        assert_eq!(stats.total_cost, 66.0);
        assert!((stats.average_mpg - 400.0 / 22.0).abs() < 1e-9);

        let january = &stats.monthly_trend[0];
        assert_eq!(january.month, "2024-01");
        assert_eq!(january.distance, 400.0);
        assert_eq!(january.gallons, 10.0);
        assert_eq!(january.cost, 30.0);
        assert_eq!(january.mpg, 40.0);

        // The newest month holds its own fuel but no distance yet.
        let february = &stats.monthly_trend[1];
        assert_eq!(february.month, "2024-02");
        assert_eq!(february.distance, 0.0);
        assert_eq!(february.gallons, 12.0);
        assert_eq!(february.cost, 36.0);
        assert_eq!(february.mpg, 0.0);
    }

    #[test]
    fn trend_buckets_reconcile_to_totals() {
        let entries = vec![
            entry((2023, 11, 2), 500.0, 8.0, 28.0),
            entry((2023, 11, 20), 780.0, 9.5, 31.0),
            entry((2023, 12, 9), 1_050.0, 10.0, 33.0),
            entry((2024, 2, 1), 1_600.0, 11.0, 35.5),
            entry((2024, 2, 14), 1_900.0, 9.0, 29.0),
        ];
        let stats = fuel_stats(&entries);

        let bucket_gallons: f64 = stats.monthly_trend.iter().map(|p| p.gallons).sum();
        let bucket_cost: f64 = stats.monthly_trend.iter().map(|p| p.cost).sum();
        let bucket_distance: f64 = stats.monthly_trend.iter().map(|p| p.distance).sum();

        assert!((bucket_gallons - stats.total_gallons).abs() < 1e-9);
        assert!((bucket_cost - stats.total_cost).abs() < 1e-9);
        assert!((bucket_distance - stats.total_distance).abs() < 1e-9);

        let months: Vec<&str> = stats
            .monthly_trend
            .iter()
            .map(|p| p.month.as_str())
            .collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-02"]);
    }

    #[test]
    fn last_fillup_ties_broken_by_odometer() {
        let stats = fuel_stats(&[
            entry((2024, 3, 10), 2_200.0, 9.0, 30.0),
            entry((2024, 3, 10), 2_500.0, 8.0, 27.0),
            entry((2024, 1, 10), 2_000.0, 10.0, 32.0),
        ]);
        let last = stats.last_fillup.unwrap();
        assert_eq!(last.odometer, 2_500.0);
    }

    #[test]
    fn empty_expenses_is_all_zero() {
        let stats = expense_stats(&[]);
        assert_eq!(stats.total_cost, 0.0);
        assert_eq!(stats.expense_count, 0);
        assert!(stats.categories.is_empty());
        assert!(stats.monthly_trend.is_empty());
    }

    #[test]
    fn category_totals_scenario() {
        let stats = expense_stats(&[
            expense((2024, 1, 3), "Insurance", 100.0),
            expense((2024, 2, 3), "Insurance", 50.0),
            expense((2024, 2, 4), "Parking", 5.0),
        ]);

        assert_eq!(stats.total_cost, 155.0);
        assert_eq!(stats.expense_count, 3);
        assert_eq!(stats.categories["Insurance"].total, 150.0);
        assert_eq!(stats.categories["Insurance"].count, 2);
        assert_eq!(stats.categories["Parking"].total, 5.0);
        assert_eq!(stats.categories["Parking"].count, 1);
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let stats = expense_stats(&[
            expense((2024, 1, 3), "insurance", 10.0),
            expense((2024, 1, 4), "Insurance", 20.0),
        ]);
        assert_eq!(stats.categories.len(), 2);
        assert_eq!(stats.categories["insurance"].total, 10.0);
        assert_eq!(stats.categories["Insurance"].total, 20.0);
    }

    #[test]
    fn expense_trend_is_month_ordered_with_category_breakdown() {
        let stats = expense_stats(&[
            expense((2024, 3, 1), "Parking", 5.0),
            expense((2024, 1, 15), "Maintenance", 120.0),
            expense((2024, 3, 20), "Maintenance", 60.0),
            expense((2024, 3, 21), "Parking", 7.0),
        ]);

        let months: Vec<&str> = stats
            .monthly_trend
            .iter()
            .map(|p| p.month.as_str())
            .collect();
        assert_eq!(months, vec!["2024-01", "2024-03"]);

        let march = &stats.monthly_trend[1];
        assert_eq!(march.total, 72.0);
        assert_eq!(march.categories["Maintenance"], 60.0);
        assert_eq!(march.categories["Parking"], 12.0);

        // Category keys iterate lexicographically, never in insertion order.
        let keys: Vec<&str> = march.categories.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Maintenance", "Parking"]);
    }
}
