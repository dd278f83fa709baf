//! Patient roster endpoints.
//!
//! - `GET /api/patients`: the acting doctor's roster
//! - `GET /api/patients/:id`: one patient
//! - `POST /api/patients/:id/chat-permission`: confirm-then-toggle chat
//! - `GET /api/patients/:id/chat-permission/logs`: audit trail
//! - `POST /api/patients/:id/chat`: open (or reuse) the patient chat

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Actor, ChatPermissionLog, Conversation, Notification, Patient};

/// `GET /api/patients`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(ctx.core.patients(&actor)?))
}

/// `GET /api/patients/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(ctx.core.patient(&patient_id)?))
}

#[derive(Deserialize)]
pub struct ChatPermissionRequest {
    /// The doctor's answer to the confirmation prompt.
    pub confirmed: bool,
}

#[derive(Serialize)]
pub struct ChatPermissionResponse {
    pub patient_id: String,
    pub prompt: String,
    pub applied: bool,
    pub chat_enabled: bool,
    pub log: Option<ChatPermissionLog>,
    pub notification: Option<Notification>,
}

/// `POST /api/patients/:id/chat-permission`
///
/// With `confirmed: false` nothing changes; the response still carries the
/// prompt so a client can ask first and confirm with a second call.
pub async fn toggle_chat_permission(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(patient_id): Path<String>,
    Json(body): Json<ChatPermissionRequest>,
) -> Result<Json<ChatPermissionResponse>, ApiError> {
    let mut prompt = String::new();
    let toggled = ctx
        .core
        .toggle_chat_permission(&patient_id, &actor, |intent| {
            prompt = intent.prompt();
            body.confirmed
        })?;

    let chat_enabled = ctx.core.patient(&patient_id)?.chat_enabled;
    let (log, notification) = match toggled {
        Some(t) => (Some(t.log), Some(t.notification)),
        None => (None, None),
    };

    Ok(Json(ChatPermissionResponse {
        patient_id,
        prompt,
        applied: log.is_some(),
        chat_enabled,
        log,
        notification,
    }))
}

/// `GET /api/patients/:id/chat-permission/logs`
pub async fn chat_permission_logs(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<ChatPermissionLog>>, ApiError> {
    ctx.core.patient(&patient_id)?;
    Ok(Json(ctx.core.chat_permission_logs(&patient_id)?))
}

/// `POST /api/patients/:id/chat`
pub async fn open_chat(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(patient_id): Path<String>,
) -> Result<Json<Conversation>, ApiError> {
    Ok(Json(ctx.core.open_patient_chat(&patient_id, &actor)?))
}
