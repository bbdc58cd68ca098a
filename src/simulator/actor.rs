use super::client::SimulatorClient;
use super::message::SimulatorRequest;
use super::SimulatorSettings;
use crate::model::{EndDateType, RESERVATION_RESOURCE_TYPE};
use crate::service::{
    CancelCapacityReservationRequest, CancelCapacityReservationResponse, CapacityReservation,
    CreateCapacityReservationRequest, CreateCapacityReservationResponse,
    DescribeCapacityReservationsRequest, DescribeCapacityReservationsResponse,
    ModifyCapacityReservationRequest, ModifyCapacityReservationResponse, ReservationState,
    ServiceError, RESERVATION_NOT_FOUND_CODE,
};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const INCORRECT_STATE_CODE: &str = "IncorrectCapacityReservationState";
const MISSING_PARAMETER_CODE: &str = "MissingParameter";
const INVALID_PARAMETER_CODE: &str = "InvalidParameterValue";

struct StoredReservation {
    reservation: CapacityReservation,
    describes_until_active: u32,
}

/// The simulated service. Owns the reservation store and answers one request at a time.
pub struct ReservationActor {
    receiver: mpsc::Receiver<SimulatorRequest>,
    store: HashMap<String, StoredReservation>,
    client_tokens: HashMap<String, String>,
    next_id_fn: Box<dyn Fn() -> String + Send + Sync>,
    settings: SimulatorSettings,
}

impl ReservationActor {
    pub fn new(
        settings: SimulatorSettings,
        next_id_fn: impl Fn() -> String + Send + Sync + 'static,
    ) -> (Self, SimulatorClient) {
        let (sender, receiver) = mpsc::channel(settings.buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            client_tokens: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
            settings,
        };
        (actor, SimulatorClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self) {
        info!("Simulator started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SimulatorRequest::Create { request, respond_to } => {
                    let _ = respond_to.send(self.create(request));
                }
                SimulatorRequest::Describe { request, respond_to } => {
                    let _ = respond_to.send(self.describe(request));
                }
                SimulatorRequest::Modify { request, respond_to } => {
                    let _ = respond_to.send(self.modify(request));
                }
                SimulatorRequest::Cancel { request, respond_to } => {
                    let _ = respond_to.send(self.cancel(request));
                }
            }
        }

        info!(size = self.store.len(), "Simulator shutdown");
    }

    fn create(
        &mut self,
        request: CreateCapacityReservationRequest,
    ) -> Result<CreateCapacityReservationResponse, ServiceError> {
        if let Some(existing) = request
            .client_token
            .as_ref()
            .and_then(|token| self.client_tokens.get(token))
            .and_then(|id| self.store.get(id))
        {
            debug!(reservation_id = %existing.reservation.capacity_reservation_id, "Idempotent create replayed");
            return Ok(CreateCapacityReservationResponse {
                capacity_reservation: existing.reservation.clone(),
            });
        }

        let instance_count = validate_create(&request)?;
        let end_date_type = request.end_date_type.unwrap_or(EndDateType::Unlimited);
        validate_end_date(end_date_type, request.end_date.is_some())?;

        let id = (self.next_id_fn)();
        let tags = request
            .tag_specifications
            .into_iter()
            .filter(|spec| spec.resource_type == RESERVATION_RESOURCE_TYPE)
            .flat_map(|spec| spec.tags)
            .collect();
        let initial_state = if self.settings.activate_after_describes == 0 {
            ReservationState::Active
        } else {
            ReservationState::Pending
        };

        let reservation = CapacityReservation {
            capacity_reservation_id: id.clone(),
            state: Some(initial_state),
            availability_zone: request.availability_zone,
            instance_type: request.instance_type,
            instance_platform: request.instance_platform,
            tenancy: Some(request.tenancy.unwrap_or_else(|| "default".to_string())),
            total_instance_count: Some(instance_count),
            available_instance_count: Some(instance_count),
            ebs_optimized: Some(request.ebs_optimized.unwrap_or(false)),
            ephemeral_storage: Some(request.ephemeral_storage.unwrap_or(false)),
            end_date: request.end_date,
            end_date_type: Some(end_date_type),
            instance_match_criteria: Some(request.instance_match_criteria.unwrap_or_else(|| "open".to_string())),
            placement_group_arn: request.placement_group_arn,
            outpost_arn: request.outpost_arn,
            tags,
        };

        if let Some(token) = request.client_token {
            self.client_tokens.insert(token, id.clone());
        }
        self.store.insert(
            id.clone(),
            StoredReservation {
                reservation: reservation.clone(),
                describes_until_active: self.settings.activate_after_describes,
            },
        );
        info!(reservation_id = %id, state = %initial_state, size = self.store.len(), "Created");

        Ok(CreateCapacityReservationResponse {
            capacity_reservation: reservation,
        })
    }

    fn describe(
        &mut self,
        request: DescribeCapacityReservationsRequest,
    ) -> Result<DescribeCapacityReservationsResponse, ServiceError> {
        if !request.capacity_reservation_ids.is_empty() {
            let reservations = request
                .capacity_reservation_ids
                .iter()
                .map(|id| self.observe(id).ok_or_else(|| not_found(id)))
                .collect::<Result<Vec<_>, _>>()?;
            debug!(count = reservations.len(), "Described by id");
            return Ok(DescribeCapacityReservationsResponse {
                capacity_reservations: reservations,
                next_token: None,
            });
        }

        let page_size = request
            .max_results
            .map(|max| max as usize)
            .unwrap_or(self.settings.page_size)
            .max(1);
        let mut ids: Vec<String> = self.store.keys().cloned().collect();
        ids.sort();
        let start = match request.next_token.as_deref() {
            Some(token) => ids.partition_point(|id| id.as_str() < token),
            None => 0,
        };

        let page: Vec<String> = ids.iter().skip(start).take(page_size).cloned().collect();
        let next_token = ids.get(start + page_size).cloned();
        let reservations = page.iter().filter_map(|id| self.observe(id)).collect();
        debug!(start, page_size, more = next_token.is_some(), "Described page");

        Ok(DescribeCapacityReservationsResponse {
            capacity_reservations: reservations,
            next_token,
        })
    }

    fn modify(
        &mut self,
        request: ModifyCapacityReservationRequest,
    ) -> Result<ModifyCapacityReservationResponse, ServiceError> {
        let id = request.capacity_reservation_id;
        let stored = self.store.get_mut(&id).ok_or_else(|| not_found(&id))?;
        refresh_expiry(&mut stored.reservation);
        let reservation = &mut stored.reservation;

        let state = reservation.state();
        if state.is_logically_absent() {
            warn!(reservation_id = %id, %state, "Modify rejected");
            return Err(incorrect_state(&id, state));
        }
        if let Some(count) = request.instance_count {
            if count <= 0 {
                return Err(ServiceError::api(400, INVALID_PARAMETER_CODE, "InstanceCount must be positive"));
            }
        }
        let end_date_type = request
            .end_date_type
            .or(reservation.end_date_type)
            .unwrap_or(EndDateType::Unlimited);
        let end_date_after = match end_date_type {
            EndDateType::Unlimited => request.end_date,
            EndDateType::Limited => request.end_date.or(reservation.end_date),
        };
        validate_end_date(end_date_type, end_date_after.is_some())?;

        if let Some(count) = request.instance_count {
            reservation.total_instance_count = Some(count);
            reservation.available_instance_count = Some(count);
        }
        reservation.end_date_type = Some(end_date_type);
        reservation.end_date = end_date_after;
        info!(reservation_id = %id, "Modified");

        Ok(ModifyCapacityReservationResponse { accepted: true })
    }

    fn cancel(
        &mut self,
        request: CancelCapacityReservationRequest,
    ) -> Result<CancelCapacityReservationResponse, ServiceError> {
        let id = request.capacity_reservation_id;
        let stored = self.store.get_mut(&id).ok_or_else(|| not_found(&id))?;
        refresh_expiry(&mut stored.reservation);

        let state = stored.reservation.state();
        if state.is_logically_absent() {
            warn!(reservation_id = %id, %state, "Cancel rejected");
            return Err(incorrect_state(&id, state));
        }
        stored.reservation.state = Some(ReservationState::Cancelled);
        stored.reservation.available_instance_count = Some(0);
        info!(reservation_id = %id, "Cancelled");

        Ok(CancelCapacityReservationResponse { accepted: true })
    }

    /// Returns the reservation as a describe would show it, counting the describe
    /// towards activation of a pending reservation.
    fn observe(&mut self, id: &str) -> Option<CapacityReservation> {
        let stored = self.store.get_mut(id)?;
        if stored.reservation.state() == ReservationState::Pending {
            stored.describes_until_active = stored.describes_until_active.saturating_sub(1);
            if stored.describes_until_active == 0 {
                stored.reservation.state = Some(ReservationState::Active);
                info!(reservation_id = id, "Activated");
            }
        }
        refresh_expiry(&mut stored.reservation);
        Some(stored.reservation.clone())
    }
}

fn refresh_expiry(reservation: &mut CapacityReservation) {
    let limited = reservation.end_date_type == Some(EndDateType::Limited);
    let lapsed = reservation.end_date.is_some_and(|end| end <= Utc::now());
    if limited && lapsed && !reservation.state().is_logically_absent() {
        reservation.state = Some(ReservationState::Expired);
        reservation.available_instance_count = Some(0);
    }
}

fn validate_create(request: &CreateCapacityReservationRequest) -> Result<i32, ServiceError> {
    let required = [
        ("AvailabilityZone", request.availability_zone.is_some()),
        ("InstanceType", request.instance_type.is_some()),
        ("InstancePlatform", request.instance_platform.is_some()),
        ("InstanceCount", request.instance_count.is_some()),
    ];
    if let Some((name, _)) = required.iter().find(|(_, present)| !present) {
        return Err(ServiceError::api(
            400,
            MISSING_PARAMETER_CODE,
            format!("The request must contain the parameter {name}"),
        ));
    }

    match request.instance_count {
        Some(count) if count > 0 => Ok(count),
        _ => Err(ServiceError::api(400, INVALID_PARAMETER_CODE, "InstanceCount must be positive")),
    }
}

fn validate_end_date(end_date_type: EndDateType, has_end_date: bool) -> Result<(), ServiceError> {
    match (end_date_type, has_end_date) {
        (EndDateType::Limited, false) => Err(ServiceError::api(
            400,
            INVALID_PARAMETER_CODE,
            "EndDate is required when EndDateType is limited",
        )),
        (EndDateType::Unlimited, true) => Err(ServiceError::api(
            400,
            INVALID_PARAMETER_CODE,
            "EndDate cannot be set when EndDateType is unlimited",
        )),
        _ => Ok(()),
    }
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::api(
        400,
        RESERVATION_NOT_FOUND_CODE,
        format!("The capacity reservation ID '{id}' does not exist"),
    )
}

fn incorrect_state(id: &str, state: ReservationState) -> ServiceError {
    ServiceError::api(
        400,
        INCORRECT_STATE_CODE,
        format!("The capacity reservation '{id}' is in state '{state}'"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{CapacityReservationApi, ServiceTag, ServiceTagSpecification};
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn spawn(settings: SimulatorSettings) -> SimulatorClient {
        let counter = Arc::new(AtomicU64::new(1));
        let (actor, client) = ReservationActor::new(settings, move || {
            format!("cr-{:017x}", counter.fetch_add(1, Ordering::SeqCst))
        });
        tokio::spawn(actor.run());
        client
    }

    fn create_request() -> CreateCapacityReservationRequest {
        CreateCapacityReservationRequest {
            availability_zone: Some("us-east-1a".to_string()),
            instance_type: Some("t2.micro".to_string()),
            instance_platform: Some("Windows".to_string()),
            instance_count: Some(1),
            ..Default::default()
        }
    }

    fn by_id(id: &str) -> DescribeCapacityReservationsRequest {
        DescribeCapacityReservationsRequest {
            capacity_reservation_ids: vec![id.to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_pending_becomes_active_after_describes() {
        let client = spawn(SimulatorSettings::default());
        let created = client.create_capacity_reservation(create_request()).await.unwrap();
        let id = created.capacity_reservation.capacity_reservation_id;
        assert_eq!(created.capacity_reservation.state, Some(ReservationState::Pending));
        assert_eq!(id.len(), "cr-".len() + 17);

        let first = client.describe_capacity_reservations(by_id(&id)).await.unwrap();
        assert_eq!(first.capacity_reservations[0].state(), ReservationState::Pending);
        let second = client.describe_capacity_reservations(by_id(&id)).await.unwrap();
        assert_eq!(second.capacity_reservations[0].state(), ReservationState::Active);
    }

    #[tokio::test]
    async fn test_create_defaults_and_tag_filtering() {
        let client = spawn(SimulatorSettings {
            activate_after_describes: 0,
            ..Default::default()
        });
        let mut request = create_request();
        request.tag_specifications = vec![
            ServiceTagSpecification {
                resource_type: "ec2-instance".to_string(),
                tags: vec![ServiceTag { key: "TestKey2".to_string(), value: "v".to_string() }],
            },
            ServiceTagSpecification {
                resource_type: RESERVATION_RESOURCE_TYPE.to_string(),
                tags: vec![ServiceTag { key: "TestKey".to_string(), value: "v".to_string() }],
            },
        ];

        let reservation = client.create_capacity_reservation(request).await.unwrap().capacity_reservation;
        assert_eq!(reservation.state(), ReservationState::Active);
        assert_eq!(reservation.tenancy.as_deref(), Some("default"));
        assert_eq!(reservation.instance_match_criteria.as_deref(), Some("open"));
        assert_eq!(reservation.end_date_type, Some(EndDateType::Unlimited));
        assert_eq!(reservation.tags.len(), 1);
        assert_eq!(reservation.tags[0].key, "TestKey");
    }

    #[tokio::test]
    async fn test_client_token_makes_create_idempotent() {
        let client = spawn(SimulatorSettings::default());
        let mut request = create_request();
        request.client_token = Some("token-1".to_string());

        let first = client.create_capacity_reservation(request.clone()).await.unwrap();
        let second = client.create_capacity_reservation(request).await.unwrap();
        assert_eq!(
            first.capacity_reservation.capacity_reservation_id,
            second.capacity_reservation.capacity_reservation_id
        );
    }

    #[tokio::test]
    async fn test_create_rejects_missing_parameters() {
        let client = spawn(SimulatorSettings::default());
        let mut request = create_request();
        request.instance_type = None;

        let err = client.create_capacity_reservation(request).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("InstanceType"));
    }

    #[tokio::test]
    async fn test_unknown_id_is_a_400_not_found() {
        let client = spawn(SimulatorSettings::default());
        let err = client
            .describe_capacity_reservations(by_id("cr-00000000000000000"))
            .await
            .unwrap_err();

        match err {
            ServiceError::Api { status, code, .. } => {
                assert_eq!(status, 400);
                assert_eq!(code, RESERVATION_NOT_FOUND_CODE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_modify_and_cancel() {
        let client = spawn(SimulatorSettings::default());
        let id = client
            .create_capacity_reservation(create_request())
            .await
            .unwrap()
            .capacity_reservation
            .capacity_reservation_id;
        let end = Utc.with_ymd_and_hms(2124, 8, 31, 23, 59, 59).unwrap();

        let modified = client
            .modify_capacity_reservation(ModifyCapacityReservationRequest {
                capacity_reservation_id: id.clone(),
                instance_count: Some(3),
                end_date: Some(end),
                end_date_type: Some(EndDateType::Limited),
            })
            .await
            .unwrap();
        assert!(modified.accepted);

        let described = client.describe_capacity_reservations(by_id(&id)).await.unwrap();
        let reservation = &described.capacity_reservations[0];
        assert_eq!(reservation.total_instance_count, Some(3));
        assert_eq!(reservation.end_date, Some(end));

        let cancelled = client
            .cancel_capacity_reservation(CancelCapacityReservationRequest {
                capacity_reservation_id: id.clone(),
            })
            .await
            .unwrap();
        assert!(cancelled.accepted);

        let described = client.describe_capacity_reservations(by_id(&id)).await.unwrap();
        assert_eq!(described.capacity_reservations[0].state(), ReservationState::Cancelled);

        let again = client
            .cancel_capacity_reservation(CancelCapacityReservationRequest {
                capacity_reservation_id: id,
            })
            .await
            .unwrap_err();
        assert_eq!(again.status(), Some(400));
    }

    #[tokio::test]
    async fn test_limited_reservation_in_the_past_is_expired() {
        let client = spawn(SimulatorSettings {
            activate_after_describes: 0,
            ..Default::default()
        });
        let mut request = create_request();
        request.end_date_type = Some(EndDateType::Limited);
        request.end_date = Some(Utc::now() - Duration::hours(1));
        let id = client
            .create_capacity_reservation(request)
            .await
            .unwrap()
            .capacity_reservation
            .capacity_reservation_id;

        let described = client.describe_capacity_reservations(by_id(&id)).await.unwrap();
        assert_eq!(described.capacity_reservations[0].state(), ReservationState::Expired);
    }

    #[tokio::test]
    async fn test_describe_paginates_in_creation_order() {
        let client = spawn(SimulatorSettings {
            page_size: 2,
            ..Default::default()
        });
        let mut created = Vec::new();
        for _ in 0..3 {
            let response = client.create_capacity_reservation(create_request()).await.unwrap();
            created.push(response.capacity_reservation.capacity_reservation_id);
        }

        let first = client
            .describe_capacity_reservations(DescribeCapacityReservationsRequest::default())
            .await
            .unwrap();
        assert_eq!(first.capacity_reservations.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some(created[2].as_str()));

        let second = client
            .describe_capacity_reservations(DescribeCapacityReservationsRequest {
                next_token: first.next_token,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(second.capacity_reservations.len(), 1);
        assert_eq!(second.capacity_reservations[0].capacity_reservation_id, created[2]);
        assert_eq!(second.next_token, None);
    }

    #[tokio::test]
    async fn test_closed_simulator_is_a_transport_error() {
        let (actor, client) = ReservationActor::new(SimulatorSettings::default(), || "cr-x".to_string());
        drop(actor);

        let err = client
            .describe_capacity_reservations(DescribeCapacityReservationsRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }
}
