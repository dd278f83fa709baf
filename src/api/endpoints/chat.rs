//! Messaging endpoints.
//!
//! - `GET /api/conversations`: list (pinned first, archived on request)
//! - `GET /api/conversations/:id/messages`: thread, oldest first
//! - `POST /api/conversations/:id/messages`: send
//! - `POST /api/conversations/:id/read`: mark read
//! - `GET /api/messages/search?q=`: search across the actor's threads

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::chat::MessageDraft;
use crate::models::{Actor, Conversation, Message};

#[derive(Deserialize)]
pub struct ConversationListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

/// `GET /api/conversations`
pub async fn conversations(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ConversationListQuery>,
) -> Result<Json<Vec<Conversation>>, ApiError> {
    Ok(Json(ctx.core.conversations(&actor, query.include_archived)?))
}

/// `GET /api/conversations/:id/messages`
pub async fn messages(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(ctx.core.conversation_messages(&conversation_id, &actor)?))
}

/// `POST /api/conversations/:id/messages`
pub async fn send(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(conversation_id): Path<String>,
    Json(draft): Json<MessageDraft>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let message = ctx.core.send_message(&conversation_id, draft, &actor)?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub conversation_id: String,
    pub marked_read: Vec<String>,
}

/// `POST /api/conversations/:id/read`
pub async fn mark_read(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(conversation_id): Path<String>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let marked_read = ctx.core.mark_conversation_read(&conversation_id, &actor)?;
    Ok(Json(MarkReadResponse {
        conversation_id,
        marked_read,
    }))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/messages/search?q=`
pub async fn search(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(ctx.core.search_messages(&query.q, &actor)?))
}
