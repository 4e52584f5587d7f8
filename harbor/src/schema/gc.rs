//! Garbage collection schedule and history schemas.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of a job schedule.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleType {
    Hourly,
    Daily,
    Weekly,
    Custom,
    Manual,
    None,
    Schedule,
}

/// JSON struct for the request body scheduling a job
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Schedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleObj>,
    /// Job parameters, e.g. `delete_untagged` and `dry_run` for garbage collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScheduleObj {
    #[serde(rename = "type")]
    pub kind: ScheduleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_scheduled_time: Option<String>,
}

/// JSON struct for a garbage collection run, also returned for the current schedule
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GcHistory {
    pub id: i64,
    pub job_name: String,
    pub job_kind: String,
    /// JSON encoded job parameters.
    pub job_parameters: Option<String>,
    pub schedule: Option<ScheduleObj>,
    pub job_status: String,
    pub deleted: bool,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_schedule_history() {
        let history: GcHistory = serde_json::from_str(
            r#"{
                "id": 1,
                "job_name": "GARBAGE_COLLECTION",
                "job_kind": "SCHEDULE",
                "job_parameters": "{\"delete_untagged\":true}",
                "schedule": { "type": "Custom", "cron": "0 0 * * * *" },
                "job_status": "Success"
            }"#,
        )
        .unwrap();

        let schedule = history.schedule.unwrap();
        assert_eq!(schedule.kind, ScheduleType::Custom);
        assert_eq!(schedule.cron.as_deref(), Some("0 0 * * * *"));
        assert_eq!(history.job_status, "Success");
    }

    #[test]
    fn serialize_schedule() {
        let schedule = Schedule {
            schedule: Some(ScheduleObj {
                kind: ScheduleType::Daily,
                cron: None,
                next_scheduled_time: None,
            }),
            parameters: None,
        };
        assert_eq!(
            serde_json::to_value(&schedule).unwrap(),
            serde_json::json!({ "schedule": { "type": "Daily" } })
        );
    }
}
