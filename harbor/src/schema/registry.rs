//! Registry endpoint schemas used by replication.

use serde::{Deserialize, Serialize};

/// JSON struct for a remote registry endpoint
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Registry {
    pub id: i64,
    pub name: String,
    pub url: String,
    /// Adapter type, e.g. "harbor", "docker-hub", "docker-registry".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<RegistryCredential>,
    pub insecure: bool,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RegistryCredential {
    /// "basic" or "oauth".
    #[serde(rename = "type")]
    pub kind: String,
    pub access_key: String,
    pub access_secret: String,
}

/// JSON struct for the request body updating a registry endpoint
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RegistryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

/// JSON struct for the request body checking a registry endpoint is reachable
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RegistryPing {
    /// Pings an existing registry when set, otherwise the fields below describe the target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

/// JSON struct describing what a registry endpoint supports
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RegistryInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub supported_resource_filters: Option<Vec<FilterStyle>>,
    pub supported_triggers: Option<Vec<String>>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FilterStyle {
    #[serde(rename = "type")]
    pub kind: String,
    pub style: String,
    pub values: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_registry() {
        let registry: Registry = serde_json::from_str(
            r#"{
                "id": 4,
                "name": "docker-hub",
                "url": "https://hub.docker.com",
                "type": "docker-hub",
                "credential": { "type": "basic", "access_key": "user", "access_secret": "*****" },
                "insecure": false,
                "status": "healthy"
            }"#,
        )
        .unwrap();

        assert_eq!(registry.id, 4);
        assert_eq!(registry.kind, "docker-hub");
        assert_eq!(registry.credential.unwrap().access_key, "user");
        assert_eq!(registry.description, "");
    }

    #[test]
    fn registry_update_skips_unset_fields() {
        let update = RegistryUpdate {
            description: Some(String::from("mirror")),
            insecure: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "description": "mirror", "insecure": true })
        );
    }
}
