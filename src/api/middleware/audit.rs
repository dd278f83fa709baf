//! Audit logging middleware.
//!
//! Logs every API request with the acting doctor, method, path, and
//! response status. Runs innermost (after the actor has been resolved).

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::ApiContext;
use crate::models::Actor;

/// Log API access for audit trail.
pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let ctx = req.extensions().get::<ApiContext>().cloned();
    let actor_id = req
        .extensions()
        .get::<Actor>()
        .map(|a| a.id.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let response = next.run(req).await;

    if let Some(ctx) = ctx {
        let status = response.status().as_u16();
        ctx.core
            .log_access(&actor_id, &format!("{method} {path}"), &format!("status:{status}"));
    }

    response
}
