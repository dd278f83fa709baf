//! Resolves the acting doctor for each request.
//!
//! Reads `X-Actor-Id` / `X-Actor-Name` and injects an `Actor` into the
//! request extensions. Missing headers fall back to the configured
//! default actor; a name without an id is ignored.

use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ACTOR_ID_HEADER, ACTOR_NAME_HEADER};
use crate::models::Actor;

pub async fn resolve_actor(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let ctx = match req.extensions().get::<ApiContext>().cloned() {
        Some(ctx) => ctx,
        None => return ApiError::Internal("missing API context".into()).into_response(),
    };

    let actor = actor_from_headers(req.headers(), &ctx.default_actor);
    req.extensions_mut().insert(actor);
    next.run(req).await
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub(crate) fn actor_from_headers(headers: &HeaderMap, default: &Actor) -> Actor {
    match header(headers, ACTOR_ID_HEADER) {
        Some(id) => {
            let name = header(headers, ACTOR_NAME_HEADER).unwrap_or(id);
            Actor::new(id, name)
        }
        None => default.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn default_actor() -> Actor {
        Actor::new("dr-james", "Dr. James Martin")
    }

    #[test]
    fn no_headers_uses_default() {
        let actor = actor_from_headers(&HeaderMap::new(), &default_actor());
        assert_eq!(actor, default_actor());
    }

    #[test]
    fn id_and_name_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(ACTOR_ID_HEADER, HeaderValue::from_static("dr-sarah"));
        headers.insert(ACTOR_NAME_HEADER, HeaderValue::from_static("Dr. Sarah Johnson"));
        let actor = actor_from_headers(&headers, &default_actor());
        assert_eq!(actor, Actor::new("dr-sarah", "Dr. Sarah Johnson"));
    }

    #[test]
    fn id_without_name_reuses_id() {
        let mut headers = HeaderMap::new();
        headers.insert(ACTOR_ID_HEADER, HeaderValue::from_static("dr-sarah"));
        let actor = actor_from_headers(&headers, &default_actor());
        assert_eq!(actor.name, "dr-sarah");
    }

    #[test]
    fn name_alone_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(ACTOR_NAME_HEADER, HeaderValue::from_static("Someone"));
        assert_eq!(actor_from_headers(&headers, &default_actor()), default_actor());
    }
}
