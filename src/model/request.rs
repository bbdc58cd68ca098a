//! Per-invocation input handed to the engine by the host.

use super::ResourceModel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// The lifecycle operation the host is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Create => "Create",
            Action::Read => "Read",
            Action::Update => "Update",
            Action::Delete => "Delete",
            Action::List => "List",
        };
        f.write_str(name)
    }
}

/// Desired state plus the ambient data the host supplies on every invocation.
///
/// `desired_resource_tags` are the stack-level tags and `system_tags` the tags
/// the orchestration system stamps on every resource it provisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerRequest {
    #[serde(default)]
    pub desired_resource_state: ResourceModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_resource_state: Option<ResourceModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_request_token: Option<String>,
    #[serde(default)]
    pub desired_resource_tags: HashMap<String, String>,
    #[serde(default)]
    pub system_tags: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl HandlerRequest {
    pub fn new(desired_resource_state: ResourceModel) -> Self {
        Self {
            desired_resource_state,
            ..Default::default()
        }
    }

    /// Same ambient data, different model. Used when one operation chains into Read.
    pub fn with_model(&self, model: ResourceModel) -> Self {
        Self {
            desired_resource_state: model,
            ..self.clone()
        }
    }
}

/// Engine-private continuation carried across invocations by the host.
///
/// The host persists it verbatim and never looks inside. It is empty on the
/// first invocation of any operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackContext {
    /// Identifier returned by create, while waiting for the reservation to become active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_reservation_id: Option<String>,
    /// Stabilization checks performed so far.
    #[serde(default)]
    pub stabilization_attempts: u32,
}

impl CallbackContext {
    pub fn is_empty(&self) -> bool {
        self.pending_reservation_id.is_none() && self.stabilization_attempts == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_context_survives_host_persistence() {
        let context = CallbackContext {
            pending_reservation_id: Some("cr-0abc".into()),
            stabilization_attempts: 3,
        };

        let persisted = serde_json::to_string(&context).unwrap();
        assert!(persisted.contains("pendingReservationId"));
        let restored: CallbackContext = serde_json::from_str(&persisted).unwrap();
        assert_eq!(restored, context);
    }

    #[test]
    fn test_empty_callback_context_deserializes_from_empty_object() {
        let restored: CallbackContext = serde_json::from_str("{}").unwrap();
        assert!(restored.is_empty());
    }
}
