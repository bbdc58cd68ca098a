//! Request and response shapes of the remote capacity reservation API.

use crate::model::EndDateType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lifecycle state reported by the service. Parsing is case-insensitive and
/// never fails: values this crate does not know map to `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationState {
    Pending,
    Active,
    Expired,
    Cancelled,
    Failed,
    Unsupported,
}

impl ReservationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationState::Pending => "pending",
            ReservationState::Active => "active",
            ReservationState::Expired => "expired",
            ReservationState::Cancelled => "cancelled",
            ReservationState::Failed => "failed",
            ReservationState::Unsupported => "unsupported",
        }
    }

    /// Cancelled and expired reservations no longer exist as far as callers are concerned.
    pub fn is_logically_absent(&self) -> bool {
        matches!(self, ReservationState::Cancelled | ReservationState::Expired)
    }
}

impl From<&str> for ReservationState {
    fn from(s: &str) -> Self {
        [
            ReservationState::Pending,
            ReservationState::Active,
            ReservationState::Expired,
            ReservationState::Cancelled,
            ReservationState::Failed,
        ]
        .into_iter()
        .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
        .unwrap_or(ReservationState::Unsupported)
    }
}

impl From<String> for ReservationState {
    fn from(s: String) -> Self {
        ReservationState::from(s.as_str())
    }
}

impl From<ReservationState> for String {
    fn from(state: ReservationState) -> Self {
        state.as_str().to_string()
    }
}

impl Display for ReservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTagSpecification {
    pub resource_type: String,
    pub tags: Vec<ServiceTag>,
}

/// Server-side truth about one reservation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityReservation {
    pub capacity_reservation_id: String,
    pub state: Option<ReservationState>,
    pub availability_zone: Option<String>,
    pub instance_type: Option<String>,
    pub instance_platform: Option<String>,
    pub tenancy: Option<String>,
    pub total_instance_count: Option<i32>,
    pub available_instance_count: Option<i32>,
    pub ebs_optimized: Option<bool>,
    pub ephemeral_storage: Option<bool>,
    pub end_date: Option<DateTime<Utc>>,
    pub end_date_type: Option<EndDateType>,
    pub instance_match_criteria: Option<String>,
    pub placement_group_arn: Option<String>,
    pub outpost_arn: Option<String>,
    #[serde(default)]
    pub tags: Vec<ServiceTag>,
}

impl CapacityReservation {
    pub fn state(&self) -> ReservationState {
        self.state.unwrap_or(ReservationState::Unsupported)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateCapacityReservationRequest {
    pub client_token: Option<String>,
    pub availability_zone: Option<String>,
    pub instance_type: Option<String>,
    pub instance_platform: Option<String>,
    pub tenancy: Option<String>,
    pub instance_count: Option<i32>,
    pub ebs_optimized: Option<bool>,
    pub ephemeral_storage: Option<bool>,
    pub end_date: Option<DateTime<Utc>>,
    pub end_date_type: Option<EndDateType>,
    pub instance_match_criteria: Option<String>,
    pub placement_group_arn: Option<String>,
    pub outpost_arn: Option<String>,
    #[serde(default)]
    pub tag_specifications: Vec<ServiceTagSpecification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCapacityReservationResponse {
    pub capacity_reservation: CapacityReservation,
}

/// Describe by identifiers, or page through everything when the list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeCapacityReservationsRequest {
    #[serde(default)]
    pub capacity_reservation_ids: Vec<String>,
    pub next_token: Option<String>,
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeCapacityReservationsResponse {
    #[serde(default)]
    pub capacity_reservations: Vec<CapacityReservation>,
    pub next_token: Option<String>,
}

/// Partial modification: `None` fields are left untouched by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifyCapacityReservationRequest {
    pub capacity_reservation_id: String,
    pub instance_count: Option<i32>,
    pub end_date: Option<DateTime<Utc>>,
    pub end_date_type: Option<EndDateType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyCapacityReservationResponse {
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelCapacityReservationRequest {
    pub capacity_reservation_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelCapacityReservationResponse {
    pub accepted: bool,
}
