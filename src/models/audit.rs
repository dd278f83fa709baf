use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::doctor::Actor;

/// One chat-permission change. Entries are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPermissionLog {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub enabled: bool,
    pub timestamp: DateTime<Utc>,
    pub changed_by: Actor,
}
