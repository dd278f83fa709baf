use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Gender, Urgency};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub patient_number: Option<String>,
    /// `None` when the source of the record did not say.
    pub gender: Option<Gender>,
    pub last_visit: DateTime<Utc>,
    pub reason: String,
    pub priority: Urgency,
    pub assigned_doctor: String,
    pub chat_enabled: bool,
    pub unread_messages: u32,
    #[serde(default)]
    pub medical_history: Vec<MedicalHistoryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistoryItem {
    pub condition: String,
    pub date: NaiveDate,
    pub treatment: String,
}
