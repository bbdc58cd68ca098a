//! Consolidation of the three tag sources into the create request's tag specifications.
//!
//! Stack tags, system tags and every caller group whose resource type is the
//! reservation's own type are merged into one group. Groups for any other
//! resource type are passed through untouched.
//!
//! Key collisions resolve last-writer-wins in the order stack, system, then
//! caller groups in declaration order. A key keeps the position of its first
//! occurrence.

use crate::model::{TagSpecification, RESERVATION_RESOURCE_TYPE};
use crate::service::{ServiceTag, ServiceTagSpecification};
use std::collections::HashMap;
use tracing::debug;

pub fn consolidate_tags(
    stack_tags: &HashMap<String, String>,
    system_tags: &HashMap<String, String>,
    tag_specifications: Option<&[TagSpecification]>,
) -> Vec<ServiceTagSpecification> {
    let mut merged = MergedTags::default();
    merged.extend_sorted(stack_tags);
    merged.extend_sorted(system_tags);
    if merged.is_empty() {
        debug!("No stack-level or system tags");
    }

    let mut specifications = Vec::new();
    for group in tag_specifications.unwrap_or_default() {
        if group.resource_type.eq_ignore_ascii_case(RESERVATION_RESOURCE_TYPE) {
            for tag in &group.tags {
                merged.insert(&tag.key, &tag.value);
            }
        } else {
            specifications.push(ServiceTagSpecification {
                resource_type: group.resource_type.clone(),
                tags: group
                    .tags
                    .iter()
                    .map(|tag| ServiceTag {
                        key: tag.key.clone(),
                        value: tag.value.clone(),
                    })
                    .collect(),
            });
        }
    }

    if !merged.is_empty() {
        specifications.push(ServiceTagSpecification {
            resource_type: RESERVATION_RESOURCE_TYPE.to_string(),
            tags: merged.0,
        });
    }

    debug!(groups = specifications.len(), "Consolidated tag specifications");
    specifications
}

#[derive(Default)]
struct MergedTags(Vec<ServiceTag>);

impl MergedTags {
    fn insert(&mut self, key: &str, value: &str) {
        match self.0.iter_mut().find(|tag| tag.key == key) {
            Some(existing) => existing.value = value.to_string(),
            None => self.0.push(ServiceTag {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    // HashMap order is arbitrary; sort so the outbound request is stable.
    fn extend_sorted(&mut self, tags: &HashMap<String, String>) {
        let mut entries: Vec<_> = tags.iter().collect();
        entries.sort();
        for (key, value) in entries {
            self.insert(key, value);
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn find<'a>(specs: &'a [ServiceTagSpecification], resource_type: &str) -> &'a ServiceTagSpecification {
        specs
            .iter()
            .find(|spec| spec.resource_type == resource_type)
            .unwrap_or_else(|| panic!("no {resource_type} group"))
    }

    #[test]
    fn test_merges_three_sources_and_passes_foreign_groups_through() {
        let user_groups = vec![
            TagSpecification::new("capacity-reservation", vec![Tag::new("tier", "gold")]),
            TagSpecification::new("ec2-instance", vec![Tag::new("foo", "bar")]),
        ];

        let specs = consolidate_tags(
            &tags(&[("env", "prod")]),
            &tags(&[("owner", "team")]),
            Some(&user_groups),
        );

        assert_eq!(specs.len(), 2);
        let own = find(&specs, "capacity-reservation");
        let mut keys: Vec<_> = own.tags.iter().map(|t| t.key.as_str()).collect();
        keys.sort();
        assert_eq!(keys, ["env", "owner", "tier"]);

        let foreign = find(&specs, "ec2-instance");
        assert_eq!(
            foreign.tags,
            vec![ServiceTag {
                key: "foo".into(),
                value: "bar".into()
            }]
        );
    }

    #[test]
    fn test_no_tags_emits_nothing() {
        let specs = consolidate_tags(&HashMap::new(), &HashMap::new(), None);
        assert!(specs.is_empty());
    }

    #[test]
    fn test_only_foreign_groups_emit_no_reservation_group() {
        let user_groups = vec![TagSpecification::new("ec2-instance", vec![Tag::new("a", "b")])];
        let specs = consolidate_tags(&HashMap::new(), &HashMap::new(), Some(&user_groups));

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].resource_type, "ec2-instance");
    }

    #[test]
    fn test_collisions_resolve_last_writer_wins() {
        let user_groups = vec![
            TagSpecification::new("Capacity-Reservation", vec![Tag::new("env", "user")]),
            TagSpecification::new("capacity-reservation", vec![Tag::new("env", "later-user")]),
        ];

        let specs = consolidate_tags(
            &tags(&[("env", "stack"), ("app", "web")]),
            &tags(&[("env", "system")]),
            Some(&user_groups),
        );

        let own = find(&specs, "capacity-reservation");
        assert_eq!(own.tags.len(), 2);
        let env: Vec<_> = own.tags.iter().filter(|t| t.key == "env").collect();
        assert_eq!(env.len(), 1);
        assert_eq!(env[0].value, "later-user");
    }
}
