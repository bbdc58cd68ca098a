use capacity_reservation::config::EngineConfig;
use capacity_reservation::engine::ReconciliationEngine;
use capacity_reservation::model::*;
use capacity_reservation::runtime::{HostDriver, LocalSystem};
use capacity_reservation::service::{CapacityReservationApi, DescribeCapacityReservationsRequest, ReservationState};
use capacity_reservation::simulator::{ReservationActor, SimulatorSettings};
use std::sync::Arc;
use std::time::Duration;

fn fast_config() -> EngineConfig {
    EngineConfig {
        callback_delay: Duration::ZERO,
        max_stabilization_attempts: 10,
    }
}

fn desired() -> ResourceModel {
    ResourceModel {
        availability_zone: Some("us-east-1a".to_string()),
        instance_type: Some("t2.micro".to_string()),
        instance_platform: Some("Windows".to_string()),
        instance_count: Some(1),
        end_date: Some("Fri Jan 01 00:00:00 GMT 2100".to_string()),
        end_date_type: Some(EndDateType::Limited),
        tag_specifications: Some(vec![TagSpecification::new(
            RESERVATION_RESOURCE_TYPE,
            vec![Tag::new("TestKey", "TestValue")],
        )]),
        ..Default::default()
    }
}

/// Full lifecycle through the host driver against the simulated service.
/// Create has to suspend and resume before the reservation turns active.
#[tokio::test]
async fn test_full_lifecycle_against_simulator() {
    let system = LocalSystem::new(
        SimulatorSettings {
            activate_after_describes: 3,
            ..Default::default()
        },
        fast_config(),
    );

    // Create: pending → active across several invocations
    let created = system.host.run(Action::Create, HandlerRequest::new(desired())).await;
    assert_eq!(created.status, OperationStatus::Success, "{:?}", created.message);
    let model = created.resource_model.expect("create returns the read model");
    let id = model.id.clone().expect("create assigns an identifier");
    assert!(id.starts_with("cr-"));
    assert_eq!(model.end_date.as_deref(), Some("2100-01-01T00:00:00Z"));
    assert_eq!(model.instance_match_criteria.as_deref(), Some("open"));
    assert_eq!(model.available_instance_count, Some(1));

    // Read returns the same identifier
    let read = system
        .host
        .run(Action::Read, HandlerRequest::new(ResourceModel::with_id(&id)))
        .await;
    assert_eq!(read.resource_model.and_then(|m| m.id), Some(id.clone()));

    // Update: only the count changes, the end date stays
    let update = HandlerRequest::new(ResourceModel {
        instance_count: Some(4),
        ..ResourceModel::with_id(&id)
    });
    let updated = system.host.run(Action::Update, update).await;
    assert_eq!(updated.status, OperationStatus::Success, "{:?}", updated.message);
    let updated = updated.resource_model.expect("update returns the read model");
    assert_eq!(updated.instance_count, Some(4));
    assert_eq!(updated.end_date.as_deref(), Some("2100-01-01T00:00:00Z"));

    // List sees it
    let listed = system.host.run(Action::List, HandlerRequest::default()).await;
    assert_eq!(listed.resource_models, Some(vec![ResourceModel::with_id(&id)]));

    // Delete, then it is gone for Read, List and a second Delete
    let deleted = system
        .host
        .run(Action::Delete, HandlerRequest::new(ResourceModel::with_id(&id)))
        .await;
    assert_eq!(deleted.status, OperationStatus::Success);
    assert!(deleted.resource_model.is_none());

    let gone = system
        .host
        .run(Action::Read, HandlerRequest::new(ResourceModel::with_id(&id)))
        .await;
    assert_eq!(gone.error_code, Some(HandlerErrorCode::NotFound));

    let listed = system.host.run(Action::List, HandlerRequest::default()).await;
    assert_eq!(listed.resource_models, Some(vec![]));

    let again = system
        .host
        .run(Action::Delete, HandlerRequest::new(ResourceModel::with_id(&id)))
        .await;
    assert_eq!(again.error_code, Some(HandlerErrorCode::InvalidRequest));

    // The service still knows the reservation, as cancelled
    let raw = system
        .client
        .describe_capacity_reservations(DescribeCapacityReservationsRequest {
            capacity_reservation_ids: vec![id],
            ..Default::default()
        })
        .await
        .expect("cancelled reservations remain describable");
    assert_eq!(raw.capacity_reservations[0].state(), ReservationState::Cancelled);

    system.shutdown().await.expect("Failed to shut down");
}

/// The host gives up once its invocation cap is reached, carrying the pending model.
#[tokio::test]
async fn test_host_driver_stops_at_invocation_cap() {
    let system = LocalSystem::new(
        SimulatorSettings {
            activate_after_describes: 50,
            ..Default::default()
        },
        fast_config(),
    );
    let host = system.host.clone().with_max_invocations(2);

    let event = host.run(Action::Create, HandlerRequest::new(desired())).await;

    assert_eq!(event.status, OperationStatus::Failed);
    assert_eq!(event.error_code, Some(HandlerErrorCode::NotStabilized));
    assert!(event.resource_model.and_then(|m| m.id).is_some());

    drop(host);
    system.shutdown().await.expect("Failed to shut down");
}

/// The engine's own attempt limit fires before the host's cap.
#[tokio::test]
async fn test_create_fails_when_reservation_never_activates() {
    let system = LocalSystem::new(
        SimulatorSettings {
            activate_after_describes: 50,
            ..Default::default()
        },
        EngineConfig {
            callback_delay: Duration::ZERO,
            max_stabilization_attempts: 3,
        },
    );

    let event = system.host.run(Action::Create, HandlerRequest::new(desired())).await;

    assert_eq!(event.status, OperationStatus::Failed);
    assert_eq!(event.error_code, Some(HandlerErrorCode::NotStabilized));
    assert!(event.resource_model.is_none());

    system.shutdown().await.expect("Failed to shut down");
}

/// Paging through List with the opaque token visits every live reservation once.
#[tokio::test]
async fn test_list_pages_through_all_reservations() {
    let system = LocalSystem::new(
        SimulatorSettings {
            activate_after_describes: 0,
            page_size: 2,
            ..Default::default()
        },
        fast_config(),
    );
    let mut created = Vec::new();
    for _ in 0..5 {
        let event = system.host.run(Action::Create, HandlerRequest::new(desired())).await;
        created.push(event.resource_model.and_then(|m| m.id).expect("created"));
    }

    let mut seen = Vec::new();
    let mut next_token = None;
    let mut pages = 0;
    loop {
        let request = HandlerRequest {
            next_token,
            ..Default::default()
        };
        let page = system.host.run(Action::List, request).await;
        pages += 1;
        seen.extend(page.resource_models.unwrap_or_default().into_iter().filter_map(|m| m.id));
        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, created);

    system.shutdown().await.expect("Failed to shut down");
}

#[tokio::test]
async fn test_engine_reports_closed_simulator_as_general_failure() {
    let (actor, client) = ReservationActor::new(SimulatorSettings::default(), || "cr-1".to_string());
    drop(actor);
    let host = HostDriver::new(ReconciliationEngine::new(Arc::new(client), fast_config()));

    let event = host
        .run(Action::Read, HandlerRequest::new(ResourceModel::with_id("cr-1")))
        .await;

    assert_eq!(event.status, OperationStatus::Failed);
    assert_eq!(event.error_code, Some(HandlerErrorCode::GeneralServiceException));
}
