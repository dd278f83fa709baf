//! Timeline endpoints.
//!
//! - `GET /api/patients/:id/timeline`: grouped, filtered timeline
//! - `POST /api/patients/:id/timeline`: add an entry
//! - `POST /api/timeline/:entry_id/notes`: annotate an entry
//! - `PUT /api/timeline/:entry_id/content`: replace an entry's content

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::enums::NoteVisibility;
use crate::models::{Actor, EntryContent, EntryDraft, TimelineEntry};
use crate::timeline::{TimelineGroup, TimelineQuery};

#[derive(Deserialize)]
pub struct TimelineParams {
    pub q: Option<String>,
    pub date: Option<NaiveDate>,
    /// Observer's offset east of UTC. Months and days are computed in it.
    pub tz_offset_minutes: Option<i32>,
}

#[derive(Serialize)]
pub struct TimelineResponse {
    pub patient_id: String,
    pub total_entries: usize,
    pub groups: Vec<TimelineGroup>,
}

fn observer_zone(offset_minutes: Option<i32>) -> Result<FixedOffset, ApiError> {
    let minutes = offset_minutes.unwrap_or(0);
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid tz_offset_minutes: {minutes}")))
}

/// `GET /api/patients/:id/timeline`
pub async fn grouped(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Query(params): Query<TimelineParams>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let tz = observer_zone(params.tz_offset_minutes)?;
    let query = TimelineQuery {
        text: params.q,
        exact_date: params.date,
    };

    let groups = ctx.core.timeline(&patient_id, &query, &tz)?;
    let total_entries = groups.iter().map(|g| g.entries.len()).sum();

    Ok(Json(TimelineResponse {
        patient_id,
        total_entries,
        groups,
    }))
}

/// `POST /api/patients/:id/timeline`
pub async fn add_entry(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(patient_id): Path<String>,
    Json(draft): Json<EntryDraft>,
) -> Result<(StatusCode, Json<TimelineEntry>), ApiError> {
    let entry = ctx.core.add_timeline_entry(&patient_id, draft, &actor)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Deserialize)]
pub struct NoteRequest {
    #[serde(default = "default_visibility")]
    pub visibility: NoteVisibility,
    pub text: String,
}

fn default_visibility() -> NoteVisibility {
    NoteVisibility::General
}

/// `POST /api/timeline/:entry_id/notes`
pub async fn add_note(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(entry_id): Path<String>,
    Json(body): Json<NoteRequest>,
) -> Result<(StatusCode, Json<TimelineEntry>), ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Note text is empty".into()));
    }
    let entry = ctx
        .core
        .add_entry_note(&entry_id, body.visibility, body.text, &actor)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `PUT /api/timeline/:entry_id/content`
pub async fn update_content(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(entry_id): Path<String>,
    Json(content): Json<EntryContent>,
) -> Result<Json<TimelineEntry>, ApiError> {
    Ok(Json(ctx.core.update_entry_content(&entry_id, content, &actor)?))
}
