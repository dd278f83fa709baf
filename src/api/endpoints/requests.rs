//! Request inbox endpoints: doctor-network invitations and patient
//! transfers addressed to the acting doctor.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{
    Actor, FriendRequest, Notification, PendingCounts, TransferDraft, TransferRequest,
};
use crate::requests::{FriendAccepted, TransferAccepted};

// ── Friend requests ──

/// `GET /api/requests/friends`
pub async fn friend_requests(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<FriendRequest>>, ApiError> {
    Ok(Json(ctx.core.friend_requests(&actor)?))
}

/// `POST /api/requests/friends/:id/accept`
pub async fn accept_friend(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<String>,
) -> Result<Json<FriendAccepted>, ApiError> {
    Ok(Json(ctx.core.accept_friend_request(&request_id, &actor)?))
}

/// `POST /api/requests/friends/:id/decline`
pub async fn decline_friend(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<String>,
) -> Result<Json<Notification>, ApiError> {
    Ok(Json(ctx.core.decline_friend_request(&request_id, &actor)?))
}

// ── Transfer requests ──

/// `GET /api/requests/transfers`
pub async fn transfer_requests(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<TransferRequest>>, ApiError> {
    Ok(Json(ctx.core.transfer_requests(&actor)?))
}

/// `POST /api/requests/transfers`
pub async fn create_transfer(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Json(draft): Json<TransferDraft>,
) -> Result<(StatusCode, Json<TransferRequest>), ApiError> {
    let request = ctx.core.create_transfer_request(draft, &actor)?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// `POST /api/requests/transfers/:id/accept`
pub async fn accept_transfer(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<String>,
) -> Result<Json<TransferAccepted>, ApiError> {
    Ok(Json(ctx.core.accept_transfer_request(&request_id, &actor)?))
}

/// `POST /api/requests/transfers/:id/decline`
pub async fn decline_transfer(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<String>,
) -> Result<Json<Notification>, ApiError> {
    Ok(Json(ctx.core.decline_transfer_request(&request_id, &actor)?))
}

/// `GET /api/requests/pending`: badge counts.
pub async fn pending(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<PendingCounts>, ApiError> {
    Ok(Json(ctx.core.pending_counts(&actor)?))
}
