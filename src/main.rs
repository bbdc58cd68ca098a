//! Walks one capacity reservation through its whole lifecycle against the
//! in-process simulator, printing every [`ProgressEvent`] as JSON.

use capacity_reservation::config::EngineConfig;
use capacity_reservation::model::{
    Action, EndDateType, HandlerRequest, ProgressEvent, ResourceModel, Tag, TagSpecification,
    RESERVATION_RESOURCE_TYPE,
};
use capacity_reservation::runtime::{setup_tracing, LocalSystem};
use capacity_reservation::simulator::SimulatorSettings;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = EngineConfig {
        callback_delay: Duration::from_secs(1),
        ..EngineConfig::from_env()
    };
    let system = LocalSystem::new(SimulatorSettings::default(), config);

    let desired = ResourceModel {
        availability_zone: Some("us-east-1a".to_string()),
        instance_type: Some("t2.micro".to_string()),
        instance_platform: Some("Windows".to_string()),
        instance_count: Some(1),
        tag_specifications: Some(vec![TagSpecification::new(
            RESERVATION_RESOURCE_TYPE,
            vec![Tag::new("TestKey", "TestValue")],
        )]),
        ..Default::default()
    };
    let mut create = HandlerRequest::new(desired);
    create.client_request_token = Some("demo-create-1".to_string());
    create.desired_resource_tags = HashMap::from([("team".to_string(), "capacity".to_string())]);

    let created = system
        .host
        .run(Action::Create, create)
        .instrument(tracing::info_span!("lifecycle", step = "create"))
        .await;
    print_event("Create", &created)?;
    let Some(model) = created.resource_model else {
        return Err(created.message.unwrap_or_else(|| "create failed".to_string()));
    };
    let id = model.id.clone().unwrap_or_default();
    info!(reservation_id = %id, "Reservation is active");

    let read = system.host.run(Action::Read, HandlerRequest::new(ResourceModel::with_id(&id))).await;
    print_event("Read", &read)?;

    let update = HandlerRequest::new(ResourceModel {
        instance_count: Some(2),
        end_date: Some("2124-08-31T23:59:59Z".to_string()),
        end_date_type: Some(EndDateType::Limited),
        ..ResourceModel::with_id(&id)
    });
    print_event("Update", &system.host.run(Action::Update, update).await)?;

    print_event("List", &system.host.run(Action::List, HandlerRequest::default()).await)?;

    let delete = system.host.run(Action::Delete, HandlerRequest::new(ResourceModel::with_id(&id))).await;
    print_event("Delete", &delete)?;

    let gone = system.host.run(Action::Read, HandlerRequest::new(ResourceModel::with_id(&id))).await;
    print_event("Read after delete", &gone)?;

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}

fn print_event(step: &str, event: &ProgressEvent) -> Result<(), String> {
    let json = serde_json::to_string_pretty(event).map_err(|e| e.to_string())?;
    println!("--- {step} ---\n{json}");
    Ok(())
}
