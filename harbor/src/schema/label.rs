//! Label schemas.

use serde::{Deserialize, Serialize};

/// Scope of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelScope {
    Global,
    Project,
}

impl LabelScope {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelScope::Global => "g",
            LabelScope::Project => "p",
        }
    }
}

/// JSON struct for a label
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Hex color, e.g. "#61717D".
    pub color: String,
    /// "g" for global labels, "p" for project labels.
    pub scope: String,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    pub deleted: bool,
}
