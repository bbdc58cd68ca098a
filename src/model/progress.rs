//! The result handed back to the host after every invocation.

use super::{CallbackContext, ResourceModel};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    InProgress,
    Success,
    Failed,
}

/// Standardized failure taxonomy reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    NotFound,
    InvalidRequest,
    ServiceInternalError,
    GeneralServiceException,
    NotStabilized,
}

impl Display for HandlerErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HandlerErrorCode::NotFound => "NotFound",
            HandlerErrorCode::InvalidRequest => "InvalidRequest",
            HandlerErrorCode::ServiceInternalError => "ServiceInternalError",
            HandlerErrorCode::GeneralServiceException => "GeneralServiceException",
            HandlerErrorCode::NotStabilized => "NotStabilized",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub status: OperationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<ResourceModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_models: Option<Vec<ResourceModel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<CallbackContext>,
    #[serde(default)]
    pub callback_delay_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HandlerErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ProgressEvent {
    pub fn success(model: Option<ResourceModel>) -> Self {
        Self {
            status: OperationStatus::Success,
            resource_model: model,
            resource_models: None,
            callback_context: None,
            callback_delay_seconds: 0,
            error_code: None,
            message: None,
            next_token: None,
        }
    }

    pub fn list(models: Vec<ResourceModel>, next_token: Option<String>) -> Self {
        Self {
            resource_models: Some(models),
            next_token,
            ..Self::success(None)
        }
    }

    /// Suspend: the host re-invokes with `context` after `delay`.
    pub fn in_progress(model: ResourceModel, context: CallbackContext, delay: Duration) -> Self {
        Self {
            status: OperationStatus::InProgress,
            resource_model: Some(model),
            callback_context: Some(context),
            callback_delay_seconds: delay.as_secs(),
            ..Self::success(None)
        }
    }

    pub fn failed(
        model: Option<ResourceModel>,
        error_code: HandlerErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: OperationStatus::Failed,
            resource_model: model,
            error_code: Some(error_code),
            message: Some(message.into()),
            ..Self::success(None)
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != OperationStatus::InProgress
    }
}
