use crate::engine::ReconciliationEngine;
use crate::model::{Action, CallbackContext, HandlerErrorCode, HandlerRequest, ProgressEvent};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Local implementation of the host contract.
///
/// Invokes the engine, keeps the continuation it hands back, waits the requested
/// delay and invokes again until the operation reaches SUCCESS or FAILED.
/// The continuation is passed back verbatim; the driver never looks inside it.
#[derive(Clone)]
pub struct HostDriver {
    engine: ReconciliationEngine,
    max_invocations: u32,
}

impl HostDriver {
    pub fn new(engine: ReconciliationEngine) -> Self {
        Self {
            engine,
            max_invocations: 100,
        }
    }

    /// Caps re-invocations of one operation. The last event is returned as FAILED past the cap.
    pub fn with_max_invocations(mut self, max_invocations: u32) -> Self {
        self.max_invocations = max_invocations.max(1);
        self
    }

    #[instrument(skip_all, fields(%action))]
    pub async fn run(&self, action: Action, request: HandlerRequest) -> ProgressEvent {
        let mut request = request;
        let mut context = CallbackContext::default();
        let mut invocations = 0;

        loop {
            let event = self.engine.handle(action, &request, context).await;
            invocations += 1;

            if event.is_terminal() {
                info!(invocations, status = ?event.status, "Operation finished");
                return event;
            }
            if invocations >= self.max_invocations {
                warn!(invocations, "Giving up on operation");
                return ProgressEvent::failed(
                    event.resource_model,
                    HandlerErrorCode::NotStabilized,
                    format!("Operation {action} did not finish within {invocations} invocations"),
                );
            }

            context = event.callback_context.unwrap_or_default();
            if let Some(model) = event.resource_model {
                request = request.with_model(model);
            }
            debug!(invocations, delay_seconds = event.callback_delay_seconds, "Re-invoking after delay");
            tokio::time::sleep(Duration::from_secs(event.callback_delay_seconds)).await;
        }
    }
}
