use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::enums::RequestStatus;
use crate::models::{Actor, DoctorSummary, Notification, Patient, TransferDraft, TransferRequest};

use super::{transition, LifecycleError};

/// Side effects of accepting a transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferAccepted {
    pub patient: Patient,
    pub notification: Notification,
}

/// Roster record for a transferred patient. The request does not carry
/// gender or patient number, so both stay unresolved.
pub fn patient_from_transfer(request: &TransferRequest, actor: &Actor, now: DateTime<Utc>) -> Patient {
    Patient {
        id: request.patient_id.clone(),
        name: request.patient_name.clone(),
        patient_number: None,
        gender: None,
        last_visit: now,
        reason: request.reason.clone(),
        priority: request.urgency,
        assigned_doctor: actor.id.clone(),
        chat_enabled: true,
        unread_messages: 0,
        medical_history: Vec::new(),
    }
}

/// Hands an existing record to the accepting doctor. Identity, history and
/// chat permission stay with the patient.
fn reassign_patient(mut patient: Patient, request: &TransferRequest, actor: &Actor, now: DateTime<Utc>) -> Patient {
    patient.assigned_doctor = actor.id.clone();
    patient.reason = request.reason.clone();
    patient.priority = request.urgency;
    patient.last_visit = now;
    patient
}

/// Accepts a pending transfer. `existing` is the stored record for the
/// request's patient, if the store already knows them.
pub fn accept_transfer_request(
    request: &mut TransferRequest,
    existing: Option<Patient>,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<TransferAccepted, LifecycleError> {
    transition(&request.id, &mut request.status, RequestStatus::Accepted)?;

    let reassigned = existing.is_some();
    let patient = match existing {
        Some(patient) => reassign_patient(patient, request, actor, now),
        None => patient_from_transfer(request, actor, now),
    };

    tracing::info!(
        request_id = %request.id,
        patient_id = %request.patient_id,
        doctor_id = %actor.id,
        reassigned,
        "Transfer request accepted"
    );

    Ok(TransferAccepted {
        patient,
        notification: Notification::success(
            format!(
                "Patient {} has been added to your patient list",
                request.patient_name
            ),
            now,
        ),
    })
}

pub fn decline_transfer_request(
    request: &mut TransferRequest,
    now: DateTime<Utc>,
) -> Result<Notification, LifecycleError> {
    transition(&request.id, &mut request.status, RequestStatus::Rejected)?;

    tracing::info!(request_id = %request.id, patient_id = %request.patient_id, "Transfer request declined");

    Ok(Notification::info("Transfer request declined", now))
}

/// Builds a pending transfer of one of `sender`'s patients to a colleague.
pub fn create_transfer_request(
    patient: &Patient,
    sender: &DoctorSummary,
    draft: TransferDraft,
    now: DateTime<Utc>,
) -> Result<(TransferRequest, Notification), LifecycleError> {
    if draft.reason.trim().is_empty() {
        return Err(LifecycleError::InvalidTransfer("a reason is required".into()));
    }
    if draft.to_doctor_id == sender.id {
        return Err(LifecycleError::InvalidTransfer(
            "cannot transfer a patient to yourself".into(),
        ));
    }
    if patient.assigned_doctor != sender.id {
        return Err(LifecycleError::InvalidTransfer(format!(
            "patient {} is not assigned to {}",
            patient.id, sender.id
        )));
    }

    let request = TransferRequest {
        id: Uuid::new_v4().to_string(),
        patient_id: patient.id.clone(),
        patient_name: patient.name.clone(),
        from_doctor: sender.clone(),
        to_doctor_id: draft.to_doctor_id,
        reason: draft.reason,
        urgency: draft.urgency,
        medical_summary: draft.medical_summary,
        status: RequestStatus::Pending,
        timestamp: now,
    };

    tracing::info!(
        request_id = %request.id,
        patient_id = %request.patient_id,
        to = %request.to_doctor_id,
        "Transfer request created"
    );

    let notification = Notification::success(
        format!(
            "Transfer request sent for patient {} to doctor {}",
            request.patient_name, request.to_doctor_id
        ),
        now,
    );
    Ok((request, notification))
}
