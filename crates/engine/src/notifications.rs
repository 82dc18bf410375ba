//! Stored reminder notifications.
//!
//! When a new fill-up pushes a reminder into `soon` or `overdue`, the alert
//! is rendered into a persistent notification with an unread/read/dismissed
//! lifecycle. There is no push delivery; clients poll the unread list.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    alerts::{AlertStatus, ReminderAlert},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ReminderDue,
    ReminderOverdue,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReminderDue => "reminder_due",
            Self::ReminderOverdue => "reminder_overdue",
        }
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "reminder_due" => Ok(Self::ReminderDue),
            "reminder_overdue" => Ok(Self::ReminderOverdue),
            other => Err(EngineError::KeyNotFound(format!(
                "invalid notification kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Unread,
    Read,
    Dismissed,
}

impl NotificationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Dismissed => "dismissed",
        }
    }
}

impl TryFrom<&str> for NotificationStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            "dismissed" => Ok(Self::Dismissed),
            other => Err(EngineError::KeyNotFound(format!(
                "invalid notification status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub vehicle_id: Uuid,
    pub reminder_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    pub dismissed_at: Option<DateTime<Utc>>,
}

/// Renders an alert into an unread notification for `user_id`.
///
/// `upcoming` alerts produce nothing. The wording follows the dimension that
/// actually fired: a negative miles_to_go means the mileage threshold was
/// crossed, otherwise the calendar one was.
#[must_use]
pub fn notification_for(
    user_id: &str,
    alert: &ReminderAlert,
    now: DateTime<Utc>,
) -> Option<Notification> {
    let (kind, title, message) = match alert.status {
        AlertStatus::Upcoming => return None,
        AlertStatus::Overdue => {
            let message = if alert.miles_to_go < 0.0 {
                format!("This service was due {:.0} miles ago", -alert.miles_to_go)
            } else {
                format!("This service was due {} days ago", -alert.days_until_due)
            };
            (
                NotificationKind::ReminderOverdue,
                format!("{} - OVERDUE", alert.reminder_name),
                message,
            )
        }
        AlertStatus::Soon => {
            let message = if alert.miles_to_go > 0.0 && alert.miles_to_go < crate::alerts::SOON_MILES
            {
                format!("Service due in {:.0} miles", alert.miles_to_go)
            } else {
                format!("Service due in {} days", alert.days_until_due)
            };
            (
                NotificationKind::ReminderDue,
                format!("{} - DUE SOON", alert.reminder_name),
                message,
            )
        }
    };

    Some(Notification {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        vehicle_id: alert.vehicle_id,
        reminder_id: alert.reminder_id,
        kind,
        title,
        message,
        status: NotificationStatus::Unread,
        created_at: now,
        dismissed_at: None,
    })
}

/// Counts surfaced by the notification badge endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub unread_count: u64,
    /// Non-dismissed `reminder_overdue` notifications.
    pub overdue_count: u64,
    /// Non-dismissed `reminder_due` notifications.
    pub upcoming_count: u64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub reminder_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub dismissed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Notification> for ActiveModel {
    fn from(notification: &Notification) -> Self {
        Self {
            id: ActiveValue::Set(notification.id.to_string()),
            user_id: ActiveValue::Set(notification.user_id.clone()),
            vehicle_id: ActiveValue::Set(notification.vehicle_id.to_string()),
            reminder_id: ActiveValue::Set(notification.reminder_id.to_string()),
            kind: ActiveValue::Set(notification.kind.as_str().to_string()),
            title: ActiveValue::Set(notification.title.clone()),
            message: ActiveValue::Set(notification.message.clone()),
            status: ActiveValue::Set(notification.status.as_str().to_string()),
            created_at: ActiveValue::Set(notification.created_at),
            dismissed_at: ActiveValue::Set(notification.dismissed_at),
        }
    }
}

impl TryFrom<Model> for Notification {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("notification not exists".to_string()))?,
            user_id: model.user_id,
            vehicle_id: Uuid::parse_str(&model.vehicle_id)
                .map_err(|_| EngineError::KeyNotFound("vehicle not exists".to_string()))?,
            reminder_id: Uuid::parse_str(&model.reminder_id)
                .map_err(|_| EngineError::KeyNotFound("reminder not exists".to_string()))?,
            kind: NotificationKind::try_from(model.kind.as_str())?,
            title: model.title,
            message: model.message,
            status: NotificationStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            dismissed_at: model.dismissed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn alert(status: AlertStatus, miles_to_go: f64, days_until_due: i64) -> ReminderAlert {
        ReminderAlert {
            vehicle_id: Uuid::new_v4(),
            reminder_id: Uuid::new_v4(),
            reminder_name: "Oil Change".to_string(),
            status,
            miles_to_go,
            days_until_due,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn upcoming_produces_nothing() {
        assert!(notification_for("alice", &alert(AlertStatus::Upcoming, 2_000.0, 90), now()).is_none());
    }

    #[test]
    fn overdue_mileage_wording() {
        let notification =
            notification_for("alice", &alert(AlertStatus::Overdue, -300.0, 0), now()).unwrap();
        assert_eq!(notification.kind, NotificationKind::ReminderOverdue);
        assert_eq!(notification.title, "Oil Change - OVERDUE");
        assert_eq!(notification.message, "This service was due 300 miles ago");
        assert_eq!(notification.status, NotificationStatus::Unread);
    }

    #[test]
    fn overdue_calendar_wording() {
        let notification =
            notification_for("alice", &alert(AlertStatus::Overdue, 0.0, -5), now()).unwrap();
        assert_eq!(notification.message, "This service was due 5 days ago");
    }

    #[test]
    fn soon_mileage_wording() {
        let notification =
            notification_for("alice", &alert(AlertStatus::Soon, 200.0, 0), now()).unwrap();
        assert_eq!(notification.kind, NotificationKind::ReminderDue);
        assert_eq!(notification.message, "Service due in 200 miles");
    }

    #[test]
    fn soon_calendar_wording() {
        let notification =
            notification_for("alice", &alert(AlertStatus::Soon, 0.0, 3), now()).unwrap();
        assert_eq!(notification.message, "Service due in 3 days");
    }
}
