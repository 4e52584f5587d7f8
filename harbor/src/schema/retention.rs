//! Tag retention policy schemas.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const RETENTION_ALGORITHM_OR: &str = "or";
pub const RETENTION_ACTION_RETAIN: &str = "retain";
pub const RETENTION_SCOPE_LEVEL_PROJECT: &str = "project";
pub const RETENTION_TRIGGER_SCHEDULE: &str = "Schedule";

/// Rule templates understood by Harbor's retention engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionTemplate {
    Always,
    LatestPushedK,
    LatestPulledN,
    NDaysSinceLastPush,
    NDaysSinceLastPull,
}

impl RetentionTemplate {
    /// Template name, which doubles as the key of the rule parameter it takes.
    pub fn as_str(self) -> &'static str {
        match self {
            RetentionTemplate::Always => "always",
            RetentionTemplate::LatestPushedK => "latestPushedK",
            RetentionTemplate::LatestPulledN => "latestPulledN",
            RetentionTemplate::NDaysSinceLastPush => "nDaysSinceLastPush",
            RetentionTemplate::NDaysSinceLastPull => "nDaysSinceLastPull",
        }
    }
}

impl std::fmt::Display for RetentionTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON struct for a retention policy
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetentionPolicy {
    pub algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub rules: Vec<RetentionRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<RetentionPolicyScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<RetentionRuleTrigger>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RetentionPolicyScope {
    pub level: String,
    /// Project ID the policy applies to.
    #[serde(rename = "ref")]
    pub reference: i64,
}

/// JSON struct for a retention rule
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetentionRule {
    pub action: String,
    pub disabled: bool,
    pub id: i64,
    pub params: HashMap<String, serde_json::Value>,
    pub priority: i64,
    pub scope_selectors: HashMap<String, Vec<RetentionSelector>>,
    pub tag_selectors: Vec<RetentionSelector>,
    pub template: String,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetentionSelector {
    /// "matches"/"excludes" for tags, "repoMatches"/"repoExcludes" for repositories.
    pub decoration: String,
    pub extras: String,
    pub kind: String,
    pub pattern: String,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetentionRuleTrigger {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<serde_json::Value>,
    /// Holds the `cron` expression for scheduled triggers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

/// JSON struct describing the templates and selectors the retention engine supports
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetentionMetadata {
    pub templates: Vec<RetentionRuleMetadata>,
    pub scope_selectors: Vec<RetentionSelectorMetadata>,
    pub tag_selectors: Vec<RetentionSelectorMetadata>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetentionRuleMetadata {
    pub rule_template: String,
    pub display_text: String,
    pub action: String,
    pub params: Option<Vec<RetentionRuleParamMetadata>>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetentionRuleParamMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub unit: String,
    pub required: bool,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetentionSelectorMetadata {
    pub display_text: String,
    pub kind: String,
    pub decorations: Vec<String>,
}

/// JSON struct for a run of a retention policy
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetentionExecution {
    pub id: i64,
    pub policy_id: i64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: String,
    pub trigger: String,
    pub dry_run: bool,
}
