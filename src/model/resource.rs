//! The declarative view of a capacity reservation, as known to the caller.
//!
//! Creation-time attributes are all optional so that the same type can carry a
//! full desired state, a partial update, or the shallow identifier-only model
//! produced by List.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Resource type name reported by the host for this provider.
pub const TYPE_NAME: &str = "AWS::EC2::CapacityReservation";

/// Tag-specification resource type that scopes tags to the reservation itself.
pub const RESERVATION_RESOURCE_TYPE: &str = "capacity-reservation";

/// Expiry policy of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndDateType {
    Unlimited,
    Limited,
}

impl EndDateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndDateType::Unlimited => "unlimited",
            EndDateType::Limited => "limited",
        }
    }
}

impl Display for EndDateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndDateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unlimited") {
            Ok(EndDateType::Unlimited)
        } else if s.eq_ignore_ascii_case("limited") {
            Ok(EndDateType::Limited)
        } else {
            Err(format!("unknown end date type: {s}"))
        }
    }
}

/// A single key/value tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A named group of tags scoped to a declared resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagSpecification {
    pub resource_type: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl TagSpecification {
    pub fn new(resource_type: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            resource_type: resource_type.into(),
            tags,
        }
    }
}

/// Declarative resource model.
///
/// `available_instance_count` and `total_instance_count` are observed-only:
/// they are filled in by Read and never sent on a mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenancy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_optimized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ephemeral_storage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_match_criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date_type: Option<EndDateType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_group_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_post_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_specifications: Option<Vec<TagSpecification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_instance_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_instance_count: Option<i32>,
}

impl ResourceModel {
    /// Shallow model carrying only the primary identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Primary identifier, for log fields.
    pub fn primary_identifier(&self) -> &str {
        self.id.as_deref().unwrap_or("<unassigned>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_serializes_pascal_case_and_skips_unset_fields() {
        let model = ResourceModel {
            id: Some("cr-1".into()),
            instance_count: Some(2),
            end_date_type: Some(EndDateType::Unlimited),
            ..Default::default()
        };

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["Id"], "cr-1");
        assert_eq!(json["InstanceCount"], 2);
        assert_eq!(json["EndDateType"], "unlimited");
        assert!(json.get("EndDate").is_none());
        assert!(json.get("TagSpecifications").is_none());
    }

    #[test]
    fn test_end_date_type_parses_case_insensitively() {
        assert_eq!("Limited".parse::<EndDateType>(), Ok(EndDateType::Limited));
        assert_eq!("UNLIMITED".parse::<EndDateType>(), Ok(EndDateType::Unlimited));
        assert!("forever".parse::<EndDateType>().is_err());
    }
}
