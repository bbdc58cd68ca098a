use super::ReconciliationEngine;
use crate::error::HandlerError;
use crate::model::{CallbackContext, HandlerErrorCode, HandlerRequest, ProgressEvent, ResourceModel};
use crate::stabilize::Mutation;
use crate::translator;
use tracing::{debug, info, instrument, warn};

impl ReconciliationEngine {
    /// Delete: verify the reservation exists, then cancel it.
    ///
    /// A reservation that cannot be shown to exist is an InvalidRequest, not a
    /// NotFound. The SUCCESS event carries no model.
    #[instrument(skip_all, fields(operation = "Delete", reservation_id = %request.desired_resource_state.primary_identifier()))]
    pub async fn delete(&self, request: &HandlerRequest, _context: CallbackContext) -> ProgressEvent {
        let model = &request.desired_resource_state;

        if let Err(e) = self.describe_existing(model).await {
            warn!(error = %e, "Pre-deletion check failed");
            return ProgressEvent::failed(None, HandlerErrorCode::InvalidRequest, e.to_string());
        }

        match self.cancel(model).await {
            Ok(()) => ProgressEvent::success(None),
            Err(e) => e.into_progress(None),
        }
    }

    async fn cancel(&self, model: &ResourceModel) -> Result<(), HandlerError> {
        let cancel = translator::to_delete_request(model)?;
        let id = cancel.capacity_reservation_id.clone();

        let response = self
            .api
            .cancel_capacity_reservation(cancel)
            .await
            .inspect_err(|e| warn!(error = %e, "Error occurred during cancellation"))?;
        if !response.accepted {
            return Err(HandlerError::NotAccepted {
                operation: "Cancel",
                id,
            });
        }

        debug!(reservation_id = %id, stabilized = Mutation::Delete.is_stabilized(None), "Deletion has stabilized");
        info!(reservation_id = %id, "Cancelled");
        Ok(())
    }
}
