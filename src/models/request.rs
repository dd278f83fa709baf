use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::doctor::DoctorSummary;
use super::enums::{RequestStatus, Urgency};

/// Invitation to join a doctor's network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: String,
    pub from: DoctorSummary,
    pub to_doctor_id: String,
    pub status: RequestStatus,
    pub timestamp: DateTime<Utc>,
}

/// Hand-off of a patient from one doctor to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub from_doctor: DoctorSummary,
    pub to_doctor_id: String,
    pub reason: String,
    pub urgency: Urgency,
    pub medical_summary: String,
    pub status: RequestStatus,
    pub timestamp: DateTime<Utc>,
}

/// Outbound transfer as filled in by the sending doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferDraft {
    pub patient_id: String,
    pub to_doctor_id: String,
    pub reason: String,
    pub urgency: Urgency,
    #[serde(default)]
    pub medical_summary: String,
}

/// Pending request counts shown as inbox badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCounts {
    pub friend_requests: u32,
    pub transfer_requests: u32,
}
