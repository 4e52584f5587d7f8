//! Replication policy, execution and task schemas.

use super::registry::Registry;
use serde::{Deserialize, Serialize};

pub const FILTER_TYPE_NAME: &str = "name";
pub const FILTER_TYPE_TAG: &str = "tag";
pub const FILTER_TYPE_LABEL: &str = "label";
pub const FILTER_TYPE_RESOURCE: &str = "resource";

pub const TRIGGER_TYPE_MANUAL: &str = "manual";
pub const TRIGGER_TYPE_SCHEDULED: &str = "scheduled";
pub const TRIGGER_TYPE_EVENT_BASED: &str = "event_based";

/// JSON struct for a replication policy
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReplicationPolicy {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Pull based replication sets the source registry, push based the destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_registry: Option<Registry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_registry: Option<Registry>,
    pub dest_namespace: String,
    /// How many levels of the source namespace are replaced by the destination one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_namespace_replace_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<ReplicationTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<ReplicationFilter>>,
    pub replicate_deletion: bool,
    #[serde(rename = "override")]
    pub override_existing: bool,
    pub enabled: bool,
    /// Bandwidth limit in KB/s, -1 for unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReplicationTrigger {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_settings: Option<TriggerSettings>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TriggerSettings {
    pub cron: String,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReplicationFilter {
    #[serde(rename = "type")]
    pub kind: String,
    /// A pattern for name and tag filters, a list of label names for label filters.
    pub value: serde_json::Value,
    /// "matches" or "excludes".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoration: Option<String>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StartReplicationExecution {
    pub policy_id: i64,
}

/// JSON struct for a replication execution
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReplicationExecution {
    pub id: i64,
    pub policy_id: i64,
    pub status: String,
    pub status_text: String,
    pub trigger: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub total: i64,
    pub failed: i64,
    pub succeed: i64,
    pub in_progress: i64,
    pub stopped: i64,
}

/// JSON struct for a single resource copied by a replication execution
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReplicationTask {
    pub id: i64,
    pub execution_id: i64,
    pub resource_type: String,
    pub src_resource: String,
    pub dst_resource: String,
    pub operation: String,
    pub status: String,
    pub job_id: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_override_field() {
        let policy = ReplicationPolicy {
            name: String::from("mirror"),
            override_existing: true,
            filters: Some(vec![ReplicationFilter {
                kind: String::from(FILTER_TYPE_NAME),
                value: serde_json::json!("library/**"),
                decoration: None,
            }]),
            ..Default::default()
        };
        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(value["override"], serde_json::json!(true));
        assert_eq!(value["filters"][0]["type"], serde_json::json!("name"));
        assert!(value.get("src_registry").is_none());
    }

    #[test]
    fn parse_execution() {
        let execution: ReplicationExecution = serde_json::from_str(
            r#"{"id": 9, "policy_id": 2, "status": "Succeed", "trigger": "manual",
                "total": 3, "succeed": 3}"#,
        )
        .unwrap();
        assert_eq!(execution.id, 9);
        assert_eq!(execution.succeed, 3);
        assert_eq!(execution.failed, 0);
    }
}
