//! Quota schemas.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resource name of the storage quota, in bytes.
pub const RESOURCE_STORAGE: &str = "storage";
/// Quota reference type of project quotas.
pub const QUOTA_REFERENCE_PROJECT: &str = "project";

/// Amount per resource name.
pub type ResourceList = HashMap<String, i64>;

/// JSON struct for a quota
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Quota {
    pub id: i64,
    /// Object the quota belongs to, e.g. `{"id": 3, "name": "library", "owner_name": "admin"}`.
    #[serde(rename = "ref")]
    pub reference: Option<serde_json::Value>,
    pub hard: ResourceList,
    pub used: ResourceList,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct QuotaUpdateReq {
    pub hard: ResourceList,
}
