use super::ReconciliationEngine;
use crate::error::HandlerError;
use crate::model::{CallbackContext, HandlerRequest, ProgressEvent};
use crate::translator;
use tracing::{info, instrument};

impl ReconciliationEngine {
    /// List one page of reservations as identifier-only models.
    ///
    /// The page token is opaque: it goes out as received and comes back as the
    /// service returned it. Cancelled reservations are skipped.
    #[instrument(skip_all, fields(operation = "List", has_token = request.next_token.is_some()))]
    pub async fn list(&self, request: &HandlerRequest, _context: CallbackContext) -> ProgressEvent {
        let describe = translator::to_list_request(request.next_token.clone());

        match self.api.describe_capacity_reservations(describe).await {
            Ok(response) => {
                let models = translator::from_list_response(&response);
                info!(
                    returned = response.capacity_reservations.len(),
                    listed = models.len(),
                    more = response.next_token.is_some(),
                    "Listed"
                );
                ProgressEvent::list(models, response.next_token)
            }
            Err(e) => HandlerError::from(e).into_progress(None),
        }
    }
}
