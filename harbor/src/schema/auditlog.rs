//! Audit log schemas.

use serde::{Deserialize, Serialize};

/// JSON struct for an audit log entry
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AuditLog {
    pub id: i64,
    pub username: String,
    /// Name of the resource acted upon, e.g. "library/nginx:latest".
    pub resource: String,
    pub resource_type: String,
    pub operation: String,
    pub op_time: Option<String>,
}
