//! API endpoint handlers.
//!
//! Each module corresponds to a portal screen. Handlers are thin: they
//! resolve inputs and delegate to `PortalState`.

pub mod chat;
pub mod doctors;
pub mod health;
pub mod patients;
pub mod requests;
pub mod timeline;
