//! Shared types for the HTTP layer.

use std::sync::Arc;

use crate::core_state::PortalState;
use crate::models::Actor;

/// Header naming the acting doctor's id.
pub const ACTOR_ID_HEADER: &str = "X-Actor-Id";
/// Header naming the acting doctor's display name.
pub const ACTOR_NAME_HEADER: &str = "X-Actor-Name";

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<PortalState>,
    /// Acting doctor when a request carries no actor headers.
    pub default_actor: Actor,
}

impl ApiContext {
    pub fn new(core: Arc<PortalState>, default_actor: Actor) -> Self {
        Self {
            core,
            default_actor,
        }
    }
}
