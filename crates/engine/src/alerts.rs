//! Maintenance reminder classification.
//!
//! A reminder has two independent trigger dimensions, distance and calendar
//! time. Each dimension is classified on its own and the combined status is
//! the maximum over the total order `upcoming < soon < overdue`, so a
//! reminder is overdue as soon as either dimension crosses its threshold.
//!
//! Evaluation is pure: the caller supplies the odometer snapshot and the
//! timestamp, and batch evaluation across a fleet must reuse one timestamp.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reminders::Reminder;

/// A mileage reminder within this many miles of its threshold is `soon`.
pub const SOON_MILES: f64 = 500.0;
/// A calendar reminder within this many days of its threshold is `soon`.
pub const SOON_DAYS: i64 = 7;

/// Alert tier. The derived `Ord` follows declaration order, which is the
/// severity order the combination rule relies on.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    #[default]
    Upcoming,
    Soon,
    Overdue,
}

impl AlertStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Soon => "soon",
            Self::Overdue => "overdue",
        }
    }
}

/// Classification of one reminder against one odometer/timestamp snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReminderAlert {
    pub vehicle_id: Uuid,
    pub reminder_id: Uuid,
    pub reminder_name: String,
    pub status: AlertStatus,
    /// Signed miles until the next service; negative once overdue. 0 when
    /// the mileage dimension is disabled.
    pub miles_to_go: f64,
    /// Signed whole days until the next service; zero or negative once
    /// overdue. 0 when the calendar dimension is disabled.
    pub days_until_due: i64,
}

/// An alert paired with its vehicle's display name, for fleet-wide lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FleetAlert {
    pub vehicle_name: String,
    pub alert: ReminderAlert,
}

/// Classifies one reminder. A reminder with both intervals at 0 stays
/// `upcoming` forever.
pub fn evaluate(reminder: &Reminder, current_odometer: f64, now: DateTime<Utc>) -> ReminderAlert {
    let mut miles_to_go = 0.0;
    let mut days_until_due = 0i64;

    let mileage_status = if reminder.interval_miles > 0.0 {
        let next_service_miles = reminder.last_service_miles + reminder.interval_miles;
        miles_to_go = next_service_miles - current_odometer;
        if current_odometer >= next_service_miles {
            AlertStatus::Overdue
        } else if miles_to_go < SOON_MILES {
            AlertStatus::Soon
        } else {
            AlertStatus::Upcoming
        }
    } else {
        AlertStatus::Upcoming
    };

    let calendar_status = if reminder.interval_days > 0 {
        let next_service_date = reminder.last_service_date + Duration::days(reminder.interval_days);
        // Whole days, truncated toward zero: due in 10 hours counts as day 0
        // and is already overdue.
        days_until_due = (next_service_date - now).num_hours() / 24;
        if days_until_due <= 0 {
            AlertStatus::Overdue
        } else if days_until_due < SOON_DAYS {
            AlertStatus::Soon
        } else {
            AlertStatus::Upcoming
        }
    } else {
        AlertStatus::Upcoming
    };

    ReminderAlert {
        vehicle_id: reminder.vehicle_id,
        reminder_id: reminder.id,
        reminder_name: reminder.name.clone(),
        status: mileage_status.max(calendar_status),
        miles_to_go,
        days_until_due,
    }
}

/// Classifies a set of reminders against one snapshot and keeps only the
/// actionable ones (`soon` or `overdue`), sorted by reminder name for stable
/// output regardless of the input collection's iteration order.
pub fn evaluate_all<'a, I>(
    reminders: I,
    current_odometer: f64,
    now: DateTime<Utc>,
) -> Vec<ReminderAlert>
where
    I: IntoIterator<Item = &'a Reminder>,
{
    let mut alerts: Vec<ReminderAlert> = reminders
        .into_iter()
        .map(|reminder| evaluate(reminder, current_odometer, now))
        .filter(|alert| alert.status != AlertStatus::Upcoming)
        .collect();
    alerts.sort_by(|a, b| {
        a.reminder_name
            .cmp(&b.reminder_name)
            .then_with(|| a.reminder_id.cmp(&b.reminder_id))
    });
    alerts
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn reminder(interval_miles: f64, interval_days: i64, last_miles: f64) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            name: "Oil Change".to_string(),
            interval_miles,
            interval_days,
            last_service_date: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            last_service_miles: last_miles,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn both_intervals_disabled_never_alerts() {
        let alert = evaluate(&reminder(0.0, 0, 10_000.0), 1_000_000.0, now());
        assert_eq!(alert.status, AlertStatus::Upcoming);
        assert_eq!(alert.miles_to_go, 0.0);
        assert_eq!(alert.days_until_due, 0);
    }

    #[test]
    fn mileage_soon_then_overdue() {
        let r = reminder(5_000.0, 0, 10_000.0);

        let alert = evaluate(&r, 14_800.0, now());
        assert_eq!(alert.status, AlertStatus::Soon);
        assert_eq!(alert.miles_to_go, 200.0);

        let alert = evaluate(&r, 15_000.0, now());
        assert_eq!(alert.status, AlertStatus::Overdue);
        assert_eq!(alert.miles_to_go, 0.0);

        let alert = evaluate(&r, 15_300.0, now());
        assert_eq!(alert.status, AlertStatus::Overdue);
        assert_eq!(alert.miles_to_go, -300.0);
    }

    #[test]
    fn mileage_threshold_is_strict() {
        // Exactly 500 miles to go is still upcoming.
        let alert = evaluate(&reminder(5_000.0, 0, 10_000.0), 14_500.0, now());
        assert_eq!(alert.status, AlertStatus::Upcoming);
        assert_eq!(alert.miles_to_go, 500.0);
    }

    #[test]
    fn calendar_overdue_counts_negative_days() {
        let mut r = reminder(0.0, 90, 0.0);
        r.last_service_date = now() - Duration::days(95);

        let alert = evaluate(&r, 0.0, now());
        assert_eq!(alert.status, AlertStatus::Overdue);
        assert_eq!(alert.days_until_due, -5);
    }

    #[test]
    fn calendar_soon_window() {
        let mut r = reminder(0.0, 30, 0.0);

        r.last_service_date = now() - Duration::days(23);
        let alert = evaluate(&r, 0.0, now());
        assert_eq!(alert.days_until_due, 7);
        assert_eq!(alert.status, AlertStatus::Upcoming);

        r.last_service_date = now() - Duration::days(24);
        let alert = evaluate(&r, 0.0, now());
        assert_eq!(alert.days_until_due, 6);
        assert_eq!(alert.status, AlertStatus::Soon);
    }

    #[test]
    fn due_within_the_day_is_overdue() {
        let mut r = reminder(0.0, 1, 0.0);
        r.last_service_date = now() - Duration::hours(14);

        // Next service in 10 hours truncates to 0 days.
        let alert = evaluate(&r, 0.0, now());
        assert_eq!(alert.days_until_due, 0);
        assert_eq!(alert.status, AlertStatus::Overdue);
    }

    #[test]
    fn overdue_wins_over_any_other_dimension() {
        // Mileage overdue, calendar nowhere near due.
        let mut r = reminder(5_000.0, 365, 10_000.0);
        r.last_service_date = now();
        let alert = evaluate(&r, 16_000.0, now());
        assert_eq!(alert.status, AlertStatus::Overdue);

        // Calendar overdue, mileage nowhere near due.
        let mut r = reminder(5_000.0, 30, 10_000.0);
        r.last_service_date = now() - Duration::days(60);
        let alert = evaluate(&r, 10_100.0, now());
        assert_eq!(alert.status, AlertStatus::Overdue);
    }

    #[test]
    fn soon_beats_upcoming_across_dimensions() {
        let mut r = reminder(5_000.0, 365, 10_000.0);
        r.last_service_date = now();
        let alert = evaluate(&r, 14_700.0, now());
        assert_eq!(alert.status, AlertStatus::Soon);
    }

    #[test]
    fn status_order_is_total() {
        assert!(AlertStatus::Overdue > AlertStatus::Soon);
        assert!(AlertStatus::Soon > AlertStatus::Upcoming);
        assert_eq!(
            AlertStatus::Soon.max(AlertStatus::Overdue),
            AlertStatus::Overdue
        );
    }

    #[test]
    fn evaluate_all_filters_upcoming_and_sorts_by_name() {
        let mut brake = reminder(5_000.0, 0, 10_000.0);
        brake.name = "Brake Fluid".to_string();
        let mut oil = reminder(5_000.0, 0, 10_200.0);
        oil.name = "Oil Change".to_string();
        let quiet = reminder(50_000.0, 0, 10_000.0);

        let alerts = evaluate_all([&oil, &quiet, &brake], 15_000.0, now());
        let names: Vec<&str> = alerts.iter().map(|a| a.reminder_name.as_str()).collect();
        assert_eq!(names, vec!["Brake Fluid", "Oil Change"]);
    }
}
