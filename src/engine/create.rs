use super::ReconciliationEngine;
use crate::error::HandlerError;
use crate::model::{CallbackContext, HandlerRequest, ProgressEvent, ResourceModel};
use crate::service::{DescribeCapacityReservationsRequest, ReservationState};
use crate::stabilize::{can_still_stabilize, Mutation};
use crate::translator;
use tracing::{debug, info, instrument, warn};

impl ReconciliationEngine {
    /// Create: issue the create call once, then wait for `active` across invocations.
    ///
    /// The first invocation creates the reservation and records its identifier
    /// in the continuation. Later invocations only describe that identifier;
    /// they never create again. An identifier the service cannot describe yet
    /// counts as not stabilized, since describe lags behind create.
    #[instrument(skip_all, fields(operation = "Create", attempt = context.stabilization_attempts))]
    pub async fn create(&self, request: &HandlerRequest, context: CallbackContext) -> ProgressEvent {
        self.create_steps(request, context)
            .await
            .unwrap_or_else(|e| e.into_progress(None))
    }

    async fn create_steps(
        &self,
        request: &HandlerRequest,
        context: CallbackContext,
    ) -> Result<ProgressEvent, HandlerError> {
        let mut model = request.desired_resource_state.clone();

        let (id, observed) = match context.pending_reservation_id.as_deref() {
            None => self.create_reservation(request, &mut model).await?,
            Some(pending) => {
                model.id = Some(pending.to_string());
                (pending.to_string(), self.observe_pending(pending).await?)
            }
        };
        let attempts = context.stabilization_attempts + 1;

        if Mutation::Create.is_stabilized(observed) {
            info!(reservation_id = %id, attempts, "Create has stabilized");
            return Ok(self.read(&request.with_model(model), CallbackContext::default()).await);
        }

        let observed_label = observed.map_or("not yet visible", |state| state.as_str());
        if observed.is_some_and(|state| !can_still_stabilize(state)) {
            return Err(HandlerError::NotStabilized {
                id,
                reason: format!("reservation entered state '{observed_label}'"),
            });
        }
        if attempts >= self.config.max_stabilization_attempts {
            return Err(HandlerError::NotStabilized {
                id,
                reason: format!("still '{observed_label}' after {attempts} checks"),
            });
        }

        debug!(reservation_id = %id, state = observed_label, attempts, "Not yet stabilized, suspending");
        let next = CallbackContext {
            pending_reservation_id: Some(id),
            stabilization_attempts: attempts,
        };
        Ok(ProgressEvent::in_progress(model, next, self.config.callback_delay))
    }

    /// Issues the create call. Identifier, match criteria and tenancy are taken
    /// from the create response; it is their only authoritative source.
    async fn create_reservation(
        &self,
        request: &HandlerRequest,
        model: &mut ResourceModel,
    ) -> Result<(String, Option<ReservationState>), HandlerError> {
        let create = translator::to_create_request(model, request);
        debug!(?create, "Creating resource");

        let response = self
            .api
            .create_capacity_reservation(create)
            .await
            .inspect_err(|e| warn!(error = %e, "Create failed"))?;

        let reservation = response.capacity_reservation;
        let id = reservation.capacity_reservation_id;
        model.id = Some(id.clone());
        model.instance_match_criteria = reservation.instance_match_criteria;
        model.tenancy = reservation.tenancy;

        let state = reservation.state.unwrap_or(ReservationState::Unsupported);
        info!(reservation_id = %id, %state, "Created");
        Ok((id, Some(state)))
    }

    /// `None` while the service does not return the reservation yet.
    async fn observe_pending(&self, id: &str) -> Result<Option<ReservationState>, HandlerError> {
        let described = self
            .api
            .describe_capacity_reservations(DescribeCapacityReservationsRequest {
                capacity_reservation_ids: vec![id.to_string()],
                ..Default::default()
            })
            .await;

        let response = match described {
            Ok(response) => response,
            Err(e) if e.is_reservation_not_found() => {
                debug!(reservation_id = id, "Pending reservation is not visible yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let Some(reservation) = response.capacity_reservations.into_iter().next() else {
            debug!(reservation_id = id, "Describe returned no reservation yet");
            return Ok(None);
        };
        let state = reservation.state();
        debug!(reservation_id = id, %state, "Observed pending reservation");
        Ok(Some(state))
    }
}
