//! Artifact and tag schemas.

use super::label::Label;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// JSON struct for an artifact (image, chart, index, ...)
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Artifact {
    pub id: i64,
    /// "IMAGE", "CHART", "CNAB", ...
    #[serde(rename = "type")]
    pub kind: String,
    pub media_type: String,
    pub manifest_media_type: String,
    pub project_id: i64,
    pub repository_id: i64,
    pub digest: String,
    pub size: i64,
    pub icon: Option<String>,
    pub push_time: Option<String>,
    pub pull_time: Option<String>,
    pub extra_attrs: Option<HashMap<String, serde_json::Value>>,
    pub annotations: Option<HashMap<String, String>>,
    /// Children of an index artifact.
    pub references: Option<Vec<ArtifactChildReference>>,
    pub tags: Option<Vec<Tag>>,
    pub labels: Option<Vec<Label>>,
    pub addition_links: Option<HashMap<String, AdditionLink>>,
}

impl Artifact {
    /// Returns the names of the tags pointing at the artifact.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .iter()
            .flatten()
            .map(|tag| tag.name.as_str())
            .collect()
    }
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ArtifactChildReference {
    pub parent_id: i64,
    pub child_id: i64,
    pub child_digest: String,
    pub platform: Option<Platform>,
    pub urls: Option<Vec<String>>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Platform {
    pub architecture: String,
    pub os: String,
    #[serde(rename = "os.version")]
    pub os_version: Option<String>,
    #[serde(rename = "os.features")]
    pub os_features: Option<Vec<String>>,
    pub variant: Option<String>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AdditionLink {
    pub href: String,
    pub absolute: bool,
}

/// JSON struct for a tag
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_time: Option<String>,
    pub immutable: bool,
    pub signed: bool,
}
