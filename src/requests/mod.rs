//! Request lifecycle: doctor-network invitations and patient transfers.
//!
//! Both request kinds start `pending` and move exactly once to `accepted`
//! or `rejected`. Every transition goes through [`transition`], which
//! refuses to touch a request that has already been decided. Accepting
//! produces the derived record (network doctor or roster patient) plus
//! the notification the acting doctor sees.

mod friend;
mod transfer;

pub use friend::*;
pub use transfer::*;

use thiserror::Error;

use crate::models::enums::RequestStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Request {request_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        request_id: String,
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
}

/// Moves `status` to `to` if and only if it is still pending.
pub fn transition(
    request_id: &str,
    status: &mut RequestStatus,
    to: RequestStatus,
) -> Result<(), LifecycleError> {
    let from = *status;
    if from.is_terminal() || !to.is_terminal() {
        tracing::warn!(request_id, from = %from, to = %to, "Refused request transition");
        return Err(LifecycleError::InvalidStateTransition {
            request_id: request_id.to_string(),
            from,
            to,
        });
    }
    *status = to;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_either_terminal_state() {
        let mut status = RequestStatus::Pending;
        transition("r1", &mut status, RequestStatus::Accepted).unwrap();
        assert_eq!(status, RequestStatus::Accepted);

        let mut status = RequestStatus::Pending;
        transition("r2", &mut status, RequestStatus::Rejected).unwrap();
        assert_eq!(status, RequestStatus::Rejected);
    }

    #[test]
    fn terminal_states_never_move() {
        for from in [RequestStatus::Accepted, RequestStatus::Rejected] {
            for to in [RequestStatus::Accepted, RequestStatus::Rejected] {
                let mut status = from;
                let err = transition("r1", &mut status, to).unwrap_err();
                assert_eq!(
                    err,
                    LifecycleError::InvalidStateTransition {
                        request_id: "r1".into(),
                        from,
                        to,
                    }
                );
                assert_eq!(status, from);
            }
        }
    }

    #[test]
    fn cannot_transition_back_to_pending() {
        let mut status = RequestStatus::Pending;
        assert!(transition("r1", &mut status, RequestStatus::Pending).is_err());
        assert_eq!(status, RequestStatus::Pending);
    }
}
