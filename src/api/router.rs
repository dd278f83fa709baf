//! Portal API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. HTTP trace spans → 2. CORS → 3. Actor resolver → 4. Audit logger

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::api::websocket;
use crate::core_state::PortalState;
use crate::models::Actor;

/// Build the portal API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn portal_router(core: Arc<PortalState>, default_actor: Actor) -> Router {
    build_router(ApiContext::new(core, default_actor))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        // Patients
        .route("/patients", get(endpoints::patients::list))
        .route("/patients/:id", get(endpoints::patients::detail))
        .route(
            "/patients/:id/chat-permission",
            post(endpoints::patients::toggle_chat_permission),
        )
        .route(
            "/patients/:id/chat-permission/logs",
            get(endpoints::patients::chat_permission_logs),
        )
        .route("/patients/:id/chat", post(endpoints::patients::open_chat))
        // Timeline
        .route(
            "/patients/:id/timeline",
            get(endpoints::timeline::grouped).post(endpoints::timeline::add_entry),
        )
        .route("/timeline/:entry_id/notes", post(endpoints::timeline::add_note))
        .route(
            "/timeline/:entry_id/content",
            put(endpoints::timeline::update_content),
        )
        // Network
        .route("/doctors", get(endpoints::doctors::list))
        .route("/doctors/:id", get(endpoints::doctors::detail))
        // Requests
        .route("/requests/pending", get(endpoints::requests::pending))
        .route("/requests/friends", get(endpoints::requests::friend_requests))
        .route(
            "/requests/friends/:id/accept",
            post(endpoints::requests::accept_friend),
        )
        .route(
            "/requests/friends/:id/decline",
            post(endpoints::requests::decline_friend),
        )
        .route(
            "/requests/transfers",
            get(endpoints::requests::transfer_requests).post(endpoints::requests::create_transfer),
        )
        .route(
            "/requests/transfers/:id/accept",
            post(endpoints::requests::accept_transfer),
        )
        .route(
            "/requests/transfers/:id/decline",
            post(endpoints::requests::decline_transfer),
        )
        // Messaging
        .route("/conversations", get(endpoints::chat::conversations))
        .route(
            "/conversations/:id/messages",
            get(endpoints::chat::messages).post(endpoints::chat::send),
        )
        .route("/conversations/:id/read", post(endpoints::chat::mark_read))
        .route("/messages/search", get(endpoints::chat::search))
        .route("/ws/notifications", get(websocket::ws_upgrade))
        .with_state(ctx.clone())
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::actor::resolve_actor))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
