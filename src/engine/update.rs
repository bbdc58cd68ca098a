use super::ReconciliationEngine;
use crate::error::HandlerError;
use crate::model::{CallbackContext, HandlerRequest, ProgressEvent, ResourceModel};
use crate::stabilize::Mutation;
use crate::translator;
use tracing::{debug, info, instrument, warn};

impl ReconciliationEngine {
    /// Update: verify the reservation exists, apply a partial modify, then Read.
    #[instrument(skip_all, fields(operation = "Update", reservation_id = %request.desired_resource_state.primary_identifier()))]
    pub async fn update(&self, request: &HandlerRequest, context: CallbackContext) -> ProgressEvent {
        match self.update_steps(&request.desired_resource_state).await {
            Ok(()) => self.read(request, context).await,
            Err(e) => e.into_progress(None),
        }
    }

    async fn update_steps(&self, model: &ResourceModel) -> Result<(), HandlerError> {
        self.describe_existing(model).await?;

        let modify = translator::to_update_request(model)?;
        let id = modify.capacity_reservation_id.clone();
        let response = self
            .api
            .modify_capacity_reservation(modify)
            .await
            .inspect_err(|e| warn!(error = %e, "Modify failed"))?;
        if !response.accepted {
            return Err(HandlerError::NotAccepted {
                operation: "Modify",
                id,
            });
        }

        debug!(reservation_id = %id, stabilized = Mutation::Update.is_stabilized(None), "Update has stabilized");
        info!(reservation_id = %id, "Updated");
        Ok(())
    }
}
