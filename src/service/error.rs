//! # Service Errors
//!
//! Failures of a remote call. Every remote operation returns this type so that
//! classification can look at a structured status code instead of an error's
//! concrete type.

/// Error code the service uses for an identifier it does not know (yet).
pub const RESERVATION_NOT_FOUND_CODE: &str = "InvalidCapacityReservationId.NotFound";

/// Error returned by a [`CapacityReservationApi`](super::CapacityReservationApi) call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service answered with an error status.
    #[error("{message} (Status Code: {status}, Error Code: {code})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    /// The call never produced a service answer.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ServiceError {
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_reservation_not_found(&self) -> bool {
        matches!(self, ServiceError::Api { code, .. } if code == RESERVATION_NOT_FOUND_CODE)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Api { status, .. } => Some(*status),
            ServiceError::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_not_found_is_matched_by_code() {
        assert!(ServiceError::api(400, RESERVATION_NOT_FOUND_CODE, "gone").is_reservation_not_found());
        assert!(!ServiceError::api(400, "InvalidParameterValue", "bad").is_reservation_not_found());
        assert!(!ServiceError::Transport("reset".to_string()).is_reservation_not_found());
    }
}
