//! # Handler Errors and Classification
//!
//! Every engine step returns `Result<_, HandlerError>`. The public operations
//! convert a failure into a FAILED [`ProgressEvent`] in exactly one place,
//! [`HandlerError::into_progress`], which runs the pure [`classify`] function.

use crate::model::{HandlerErrorCode, ProgressEvent, ResourceModel, TYPE_NAME};
use crate::service::ServiceError;

/// Failure of a single engine step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HandlerError {
    /// Missing identifier, an empty describe result, or a cancelled/expired reservation.
    #[error(
        "Resource of type '{}' with identifier '{}' was not found.",
        TYPE_NAME,
        .0.as_deref().unwrap_or("null")
    )]
    NotFound(Option<String>),

    /// A request the engine refuses before or instead of calling the service.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The reservation did not reach the state the step requires.
    #[error("Resource of type '{type_name}' with identifier '{id}' did not stabilize: {reason}", type_name = TYPE_NAME)]
    NotStabilized { id: String, reason: String },

    /// The service answered but refused to apply a mutation.
    #[error("{operation} of '{id}' was not accepted by the service")]
    NotAccepted { operation: &'static str, id: String },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl HandlerError {
    pub fn not_found(id: Option<&str>) -> Self {
        HandlerError::NotFound(id.map(str::to_string))
    }

    pub fn code(&self) -> HandlerErrorCode {
        classify(self)
    }

    /// Terminal FAILED event carrying the classified code and the error text verbatim.
    pub fn into_progress(self, model: Option<ResourceModel>) -> ProgressEvent {
        ProgressEvent::failed(model, self.code(), self.to_string())
    }
}

/// Maps a failure onto the host's error taxonomy.
///
/// Local preconditions are checked first, then the remote status code:
/// 5xx is a service-side fault, 4xx a request-shape fault. Everything else,
/// including transport failures, is a general service exception.
pub fn classify(error: &HandlerError) -> HandlerErrorCode {
    match error {
        HandlerError::NotFound(_) => HandlerErrorCode::NotFound,
        HandlerError::NotStabilized { .. } => HandlerErrorCode::NotStabilized,
        HandlerError::InvalidRequest(_) => HandlerErrorCode::InvalidRequest,
        HandlerError::Service(service) => match service.status() {
            Some(status) if (500..600).contains(&status) => HandlerErrorCode::ServiceInternalError,
            Some(status) if (400..500).contains(&status) => HandlerErrorCode::InvalidRequest,
            _ => HandlerErrorCode::GeneralServiceException,
        },
        HandlerError::NotAccepted { .. } => HandlerErrorCode::GeneralServiceException,
    }
}
