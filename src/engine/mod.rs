//! # Reconciliation Engine
//!
//! Drives one capacity reservation through Create, Read, Update, Delete and
//! List against the remote service. Each operation is one sequence of awaited
//! remote calls; nothing runs concurrently and no state survives an invocation
//! except what is returned in the [`CallbackContext`].
//!
//! ## Step ordering
//!
//! | Operation | Steps |
//! |-----------|-------|
//! | Create | create → stabilize (suspend with IN_PROGRESS until `active`) → Read |
//! | Read | require id → describe → cancelled/expired is NotFound → map back |
//! | Update | existence check → partial modify → Read |
//! | Delete | existence check (failure reported as InvalidRequest) → cancel |
//! | List | describe page → drop cancelled → identifier-only models |
//!
//! Create and Update finish by calling [`ReconciliationEngine::read`], so the
//! model they return is always the authoritative describe result.

mod create;
mod delete;
mod list;
mod read;
mod update;

use crate::config::EngineConfig;
use crate::error::HandlerError;
use crate::model::{Action, CallbackContext, HandlerRequest, ProgressEvent, ResourceModel};
use crate::service::{CapacityReservation, CapacityReservationApi};
use crate::translator;
use std::sync::Arc;
use tracing::{debug, warn};

/// Entry point the host calls once per invocation.
#[derive(Clone)]
pub struct ReconciliationEngine {
    api: Arc<dyn CapacityReservationApi>,
    config: EngineConfig,
}

impl ReconciliationEngine {
    pub fn new(api: Arc<dyn CapacityReservationApi>, config: EngineConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Dispatches one host invocation.
    pub async fn handle(
        &self,
        action: Action,
        request: &HandlerRequest,
        context: CallbackContext,
    ) -> ProgressEvent {
        match action {
            Action::Create => self.create(request, context).await,
            Action::Read => self.read(request, context).await,
            Action::Update => self.update(request, context).await,
            Action::Delete => self.delete(request, context).await,
            Action::List => self.list(request, context).await,
        }
    }

    /// Describes the model's reservation and insists that it logically exists.
    ///
    /// Shared by Read and by the Update/Delete existence checks. A missing id
    /// fails before any remote call; an empty result and a cancelled or expired
    /// reservation all fail as NotFound.
    async fn describe_existing(&self, model: &ResourceModel) -> Result<CapacityReservation, HandlerError> {
        let describe = translator::to_read_request(model)?;
        let id = model.id.as_deref();

        let response = self
            .api
            .describe_capacity_reservations(describe)
            .await
            .inspect_err(|e| warn!(reservation_id = ?id, error = %e, "Error while describing capacity reservation"))?;

        let Some(reservation) = response.capacity_reservations.into_iter().next() else {
            warn!(reservation_id = ?id, "Describe returned no reservation");
            return Err(HandlerError::not_found(id));
        };

        let state = reservation.state();
        if state.is_logically_absent() {
            warn!(reservation_id = ?id, %state, "Reservation exists but is no longer usable");
            return Err(HandlerError::not_found(id));
        }

        debug!(reservation_id = ?id, %state, "Reservation has been read");
        Ok(reservation)
    }
}
