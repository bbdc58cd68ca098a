//! # CapacityReservationApi Trait
//!
//! The seam between the engine and the remote service. Credential injection and
//! transport live behind an implementation of this trait; the engine only sees
//! typed requests, typed responses and [`ServiceError`].

use super::error::ServiceError;
use super::types::*;
use async_trait::async_trait;

/// Remote capacity reservation operations.
///
/// Implementations are expected to be cheap to share (`Arc<dyn CapacityReservationApi>`).
/// The engine never has more than one call in flight for a given reservation.
#[async_trait]
pub trait CapacityReservationApi: Send + Sync {
    async fn create_capacity_reservation(
        &self,
        request: CreateCapacityReservationRequest,
    ) -> Result<CreateCapacityReservationResponse, ServiceError>;

    async fn describe_capacity_reservations(
        &self,
        request: DescribeCapacityReservationsRequest,
    ) -> Result<DescribeCapacityReservationsResponse, ServiceError>;

    async fn modify_capacity_reservation(
        &self,
        request: ModifyCapacityReservationRequest,
    ) -> Result<ModifyCapacityReservationResponse, ServiceError>;

    async fn cancel_capacity_reservation(
        &self,
        request: CancelCapacityReservationRequest,
    ) -> Result<CancelCapacityReservationResponse, ServiceError>;
}
