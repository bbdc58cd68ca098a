//! Stabilization predicates.
//!
//! A predicate only answers "has the reservation reached the state this step
//! requires". Suspending and resuming is the engine's job: a `false` answer
//! becomes an IN_PROGRESS event with a callback delay, never a local loop.

use crate::service::ReservationState;

/// The mutation whose completion is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    /// Create requires an observed `active` state; modify and cancel are
    /// synchronous on the service side and need no observation at all.
    pub fn is_stabilized(&self, observed: Option<ReservationState>) -> bool {
        match self {
            Mutation::Create => observed == Some(ReservationState::Active),
            Mutation::Update | Mutation::Delete => true,
        }
    }
}

/// Whether a reservation still waiting on Create can ever become active.
pub fn can_still_stabilize(observed: ReservationState) -> bool {
    matches!(
        observed,
        ReservationState::Pending | ReservationState::Active | ReservationState::Unsupported
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_active() {
        assert!(Mutation::Create.is_stabilized(Some(ReservationState::Active)));
        assert!(!Mutation::Create.is_stabilized(Some(ReservationState::Pending)));
        assert!(!Mutation::Create.is_stabilized(Some(ReservationState::Unsupported)));
        assert!(!Mutation::Create.is_stabilized(None));
        assert!(Mutation::Create.is_stabilized(Some(ReservationState::from("ACTIVE"))));
    }

    #[test]
    fn test_update_and_delete_are_always_stable() {
        for state in [None, Some(ReservationState::Pending), Some(ReservationState::Cancelled)] {
            assert!(Mutation::Update.is_stabilized(state));
            assert!(Mutation::Delete.is_stabilized(state));
        }
    }

    #[test]
    fn test_terminal_states_cannot_stabilize() {
        assert!(can_still_stabilize(ReservationState::Pending));
        assert!(!can_still_stabilize(ReservationState::Cancelled));
        assert!(!can_still_stabilize(ReservationState::Expired));
        assert!(!can_still_stabilize(ReservationState::Failed));
    }
}
