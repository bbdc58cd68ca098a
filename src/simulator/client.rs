use super::message::{Response, SimulatorRequest};
use crate::service::*;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

/// Sending half of the simulator. Cheap to clone; the actor stops once every clone is dropped.
#[derive(Clone)]
pub struct SimulatorClient {
    sender: mpsc::Sender<SimulatorRequest>,
}

impl SimulatorClient {
    pub fn new(sender: mpsc::Sender<SimulatorRequest>) -> Self {
        Self { sender }
    }

    async fn call<T>(&self, message: impl FnOnce(Response<T>) -> SimulatorRequest) -> Result<T, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(message(respond_to))
            .await
            .map_err(|_| ServiceError::Transport("simulator is closed".to_string()))?;
        response
            .await
            .map_err(|_| ServiceError::Transport("simulator dropped the response channel".to_string()))?
    }
}

#[async_trait]
impl CapacityReservationApi for SimulatorClient {
    #[instrument(skip_all)]
    async fn create_capacity_reservation(
        &self,
        request: CreateCapacityReservationRequest,
    ) -> Result<CreateCapacityReservationResponse, ServiceError> {
        self.call(|respond_to| SimulatorRequest::Create { request, respond_to }).await
    }

    #[instrument(skip_all)]
    async fn describe_capacity_reservations(
        &self,
        request: DescribeCapacityReservationsRequest,
    ) -> Result<DescribeCapacityReservationsResponse, ServiceError> {
        self.call(|respond_to| SimulatorRequest::Describe { request, respond_to }).await
    }

    #[instrument(skip_all)]
    async fn modify_capacity_reservation(
        &self,
        request: ModifyCapacityReservationRequest,
    ) -> Result<ModifyCapacityReservationResponse, ServiceError> {
        self.call(|respond_to| SimulatorRequest::Modify { request, respond_to }).await
    }

    #[instrument(skip_all)]
    async fn cancel_capacity_reservation(
        &self,
        request: CancelCapacityReservationRequest,
    ) -> Result<CancelCapacityReservationResponse, ServiceError> {
        self.call(|respond_to| SimulatorRequest::Cancel { request, respond_to }).await
    }
}
