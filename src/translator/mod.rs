//! # Request Translation
//!
//! Bidirectional mapping between [`ResourceModel`] and the remote service's
//! request/response shapes, one pair per operation:
//!
//! | Operation | Outbound | Inbound |
//! |-----------|----------|---------|
//! | Create | [`to_create_request`] | (identifier, tenancy, match criteria from the response) |
//! | Read | [`to_read_request`] | [`from_reservation`] |
//! | Update | [`to_update_request`] | via Read |
//! | Delete | [`to_delete_request`] | none |
//! | List | [`to_list_request`] | [`from_list_response`] |
//!
//! Requests that need an identifier fail locally with NotFound before any
//! remote call is made.

pub mod dates;
pub mod tags;

pub use dates::{format_end_date, parse_end_date};
pub use tags::consolidate_tags;

use crate::error::HandlerError;
use crate::model::{HandlerRequest, ResourceModel, Tag, TagSpecification, RESERVATION_RESOURCE_TYPE};
use crate::service::{
    CancelCapacityReservationRequest, CapacityReservation, CreateCapacityReservationRequest,
    DescribeCapacityReservationsRequest, DescribeCapacityReservationsResponse,
    ModifyCapacityReservationRequest, ReservationState,
};
use tracing::debug;

/// Builds the create request, merging stack, system and caller tags.
pub fn to_create_request(
    model: &ResourceModel,
    request: &HandlerRequest,
) -> CreateCapacityReservationRequest {
    CreateCapacityReservationRequest {
        client_token: request.client_request_token.clone(),
        availability_zone: model.availability_zone.clone(),
        instance_type: model.instance_type.clone(),
        instance_platform: model.instance_platform.clone(),
        tenancy: model.tenancy.clone(),
        instance_count: model.instance_count,
        ebs_optimized: model.ebs_optimized,
        ephemeral_storage: model.ephemeral_storage,
        end_date: parse_end_date(model.end_date.as_deref()),
        end_date_type: model.end_date_type,
        instance_match_criteria: model.instance_match_criteria.clone(),
        placement_group_arn: model.placement_group_arn.clone(),
        outpost_arn: model.out_post_arn.clone(),
        tag_specifications: consolidate_tags(
            &request.desired_resource_tags,
            &request.system_tags,
            model.tag_specifications.as_deref(),
        ),
    }
}

/// Describe-by-identifier request.
pub fn to_read_request(model: &ResourceModel) -> Result<DescribeCapacityReservationsRequest, HandlerError> {
    let id = require_id(model)?;
    Ok(DescribeCapacityReservationsRequest {
        capacity_reservation_ids: vec![id.to_string()],
        ..Default::default()
    })
}

/// Full model from the authoritative describe entry.
///
/// Tags come back as a single group scoped to the reservation's own type, and
/// the reserved instance count is reported as the total instance count.
pub fn from_reservation(reservation: &CapacityReservation) -> ResourceModel {
    let tags = reservation
        .tags
        .iter()
        .map(|tag| Tag::new(tag.key.clone(), tag.value.clone()))
        .collect();

    ResourceModel {
        id: Some(reservation.capacity_reservation_id.clone()),
        availability_zone: reservation.availability_zone.clone(),
        instance_type: reservation.instance_type.clone(),
        instance_platform: reservation.instance_platform.clone(),
        tenancy: reservation.tenancy.clone(),
        instance_count: reservation.total_instance_count,
        ebs_optimized: reservation.ebs_optimized,
        ephemeral_storage: reservation.ephemeral_storage,
        instance_match_criteria: reservation.instance_match_criteria.clone(),
        end_date: reservation.end_date.as_ref().map(format_end_date),
        end_date_type: reservation.end_date_type,
        placement_group_arn: reservation.placement_group_arn.clone(),
        out_post_arn: reservation.outpost_arn.clone(),
        tag_specifications: Some(vec![TagSpecification::new(RESERVATION_RESOURCE_TYPE, tags)]),
        available_instance_count: reservation.available_instance_count,
        total_instance_count: reservation.total_instance_count,
    }
}

/// Partial modify request: only fields the caller supplied are set.
pub fn to_update_request(model: &ResourceModel) -> Result<ModifyCapacityReservationRequest, HandlerError> {
    let id = require_id(model)?;
    debug!(reservation_id = id, ?model, "Building modify request");

    Ok(ModifyCapacityReservationRequest {
        capacity_reservation_id: id.to_string(),
        instance_count: model.instance_count,
        end_date: parse_end_date(model.end_date.as_deref()),
        end_date_type: model.end_date_type,
    })
}

pub fn to_delete_request(model: &ResourceModel) -> Result<CancelCapacityReservationRequest, HandlerError> {
    let id = require_id(model)?;
    Ok(CancelCapacityReservationRequest {
        capacity_reservation_id: id.to_string(),
    })
}

/// Describe-everything request carrying the opaque page token.
pub fn to_list_request(next_token: Option<String>) -> DescribeCapacityReservationsRequest {
    DescribeCapacityReservationsRequest {
        next_token,
        ..Default::default()
    }
}

/// Identifier-only models for every reservation that is not cancelled.
pub fn from_list_response(response: &DescribeCapacityReservationsResponse) -> Vec<ResourceModel> {
    response
        .capacity_reservations
        .iter()
        .filter(|reservation| reservation.state() != ReservationState::Cancelled)
        .map(|reservation| ResourceModel::with_id(reservation.capacity_reservation_id.clone()))
        .collect()
}

fn require_id(model: &ResourceModel) -> Result<&str, HandlerError> {
    match model.id.as_deref() {
        Some(id) => {
            debug!(reservation_id = id, "Capacity reservation ID");
            Ok(id)
        }
        None => {
            debug!("Capacity reservation ID is missing");
            Err(HandlerError::not_found(None))
        }
    }
}
