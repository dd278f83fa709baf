//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Actor resolver: who is acting
//! 2. Audit logger: logs with the resolved actor

pub mod actor;
pub mod audit;
