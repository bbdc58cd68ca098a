use super::ReconciliationEngine;
use crate::error::HandlerError;
use crate::model::{CallbackContext, HandlerRequest, ProgressEvent};
use crate::translator;
use tracing::{info, instrument};

impl ReconciliationEngine {
    /// Read: hydrate the model from the authoritative describe response.
    ///
    /// Also the terminal step of Create and Update.
    #[instrument(skip_all, fields(operation = "Read", reservation_id = %request.desired_resource_state.primary_identifier()))]
    pub async fn read(&self, request: &HandlerRequest, _context: CallbackContext) -> ProgressEvent {
        self.read_steps(request)
            .await
            .unwrap_or_else(|e| e.into_progress(None))
    }

    async fn read_steps(&self, request: &HandlerRequest) -> Result<ProgressEvent, HandlerError> {
        let reservation = self.describe_existing(&request.desired_resource_state).await?;
        let model = translator::from_reservation(&reservation);
        info!(state = %reservation.state(), "Read");
        Ok(ProgressEvent::success(Some(model)))
    }
}
