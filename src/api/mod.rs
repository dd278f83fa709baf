//! HTTP surface of the portal.
//!
//! Exposes `PortalState` operations as JSON endpoints. Routes are nested
//! under `/api/`; every request passes Actor → Audit middleware before
//! reaching its handler.
//!
//! The router is composable: `portal_router()` returns a `Router` that
//! can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;
pub mod websocket;

pub use router::portal_router;
pub use server::{start_server, PortalServer, ServerError, ServerSession};
pub use types::ApiContext;
