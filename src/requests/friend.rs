use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::enums::RequestStatus;
use crate::models::{
    Availability, ContactInfo, DoctorSummary, FriendRequest, NetworkDoctor, Notification,
};

use super::{transition, LifecycleError};

/// Side effects of accepting a network invitation.
#[derive(Debug, Clone, Serialize)]
pub struct FriendAccepted {
    pub doctor: NetworkDoctor,
    pub notification: Notification,
}

/// Network record for a newly accepted colleague. Only what the invitation
/// carried is known; the hospital doubles as the contact address.
pub fn network_doctor_from(summary: &DoctorSummary) -> NetworkDoctor {
    NetworkDoctor {
        id: summary.id.clone(),
        name: summary.name.clone(),
        specialization: summary.specialization.clone(),
        experience: String::new(),
        education: Vec::new(),
        certifications: Vec::new(),
        contact: ContactInfo {
            email: String::new(),
            phone: String::new(),
            address: summary.hospital.clone(),
        },
        availability: Availability::default(),
        rating: 0.0,
        total_patients: 0,
    }
}

pub fn accept_friend_request(
    request: &mut FriendRequest,
    now: DateTime<Utc>,
) -> Result<FriendAccepted, LifecycleError> {
    transition(&request.id, &mut request.status, RequestStatus::Accepted)?;

    tracing::info!(request_id = %request.id, doctor_id = %request.from.id, "Friend request accepted");

    Ok(FriendAccepted {
        doctor: network_doctor_from(&request.from),
        notification: Notification::success(
            format!("{} has been added to your network", request.from.name),
            now,
        ),
    })
}

pub fn decline_friend_request(
    request: &mut FriendRequest,
    now: DateTime<Utc>,
) -> Result<Notification, LifecycleError> {
    transition(&request.id, &mut request.status, RequestStatus::Rejected)?;

    tracing::info!(request_id = %request.id, doctor_id = %request.from.id, "Friend request declined");

    Ok(Notification::info("Friend request declined", now))
}
