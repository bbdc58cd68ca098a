use crate::service::*;
use tokio::sync::oneshot;

/// One-shot reply channel carried by every request.
pub type Response<T> = oneshot::Sender<Result<T, ServiceError>>;

/// Messages understood by [`ReservationActor`](super::ReservationActor), one per remote operation.
#[derive(Debug)]
pub enum SimulatorRequest {
    Create {
        request: CreateCapacityReservationRequest,
        respond_to: Response<CreateCapacityReservationResponse>,
    },
    Describe {
        request: DescribeCapacityReservationsRequest,
        respond_to: Response<DescribeCapacityReservationsResponse>,
    },
    Modify {
        request: ModifyCapacityReservationRequest,
        respond_to: Response<ModifyCapacityReservationResponse>,
    },
    Cancel {
        request: CancelCapacityReservationRequest,
        respond_to: Response<CancelCapacityReservationResponse>,
    },
}
