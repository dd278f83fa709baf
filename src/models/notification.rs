use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::NotificationKind;

/// User-facing outcome of a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(NotificationKind::Success, message, now)
    }

    pub fn info(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(NotificationKind::Info, message, now)
    }

    fn new(kind: NotificationKind, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            message: message.into(),
            created_at: now,
        }
    }
}
