//! Doctor network endpoints.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Actor, NetworkDoctor};

/// `GET /api/doctors`: colleagues in the acting doctor's network.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<NetworkDoctor>>, ApiError> {
    Ok(Json(ctx.core.network_doctors(&actor)?))
}

/// `GET /api/doctors/:id`: full profile.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<String>,
) -> Result<Json<NetworkDoctor>, ApiError> {
    Ok(Json(ctx.core.doctor(&doctor_id)?))
}
