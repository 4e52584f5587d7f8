//! System configuration schemas.

use serde::{Deserialize, Serialize};

/// JSON struct for the request body updating system configurations.
/// Only the fields that are set are sent.
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configurations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_insecure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_base_dn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_search_dn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_search_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_verify_cert: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_verify_cert: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_creation_restriction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_per_project_enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robot_name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robot_token_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_registration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_per_project: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expiration: Option<i64>,
}

impl Configurations {
    /// True when no configuration field is set.
    pub fn is_empty(&self) -> bool {
        self == &Configurations::default()
    }
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StringConfigItem {
    pub value: String,
    pub editable: bool,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BoolConfigItem {
    pub value: bool,
    pub editable: bool,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct IntegerConfigItem {
    pub value: i64,
    pub editable: bool,
}

/// JSON struct for the system configurations as reported by Harbor.
/// Each item carries its value and whether it can be changed.
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConfigurationsResponse {
    pub auth_mode: Option<StringConfigItem>,
    pub email_from: Option<StringConfigItem>,
    pub email_host: Option<StringConfigItem>,
    pub email_identity: Option<StringConfigItem>,
    pub email_insecure: Option<BoolConfigItem>,
    pub email_port: Option<IntegerConfigItem>,
    pub email_ssl: Option<BoolConfigItem>,
    pub email_username: Option<StringConfigItem>,
    pub ldap_base_dn: Option<StringConfigItem>,
    pub ldap_filter: Option<StringConfigItem>,
    pub ldap_search_dn: Option<StringConfigItem>,
    pub ldap_timeout: Option<IntegerConfigItem>,
    pub ldap_uid: Option<StringConfigItem>,
    pub ldap_url: Option<StringConfigItem>,
    pub ldap_verify_cert: Option<BoolConfigItem>,
    pub oidc_client_id: Option<StringConfigItem>,
    pub oidc_endpoint: Option<StringConfigItem>,
    pub oidc_name: Option<StringConfigItem>,
    pub oidc_scope: Option<StringConfigItem>,
    pub oidc_verify_cert: Option<BoolConfigItem>,
    pub project_creation_restriction: Option<StringConfigItem>,
    pub quota_per_project_enable: Option<BoolConfigItem>,
    pub read_only: Option<BoolConfigItem>,
    pub robot_name_prefix: Option<StringConfigItem>,
    pub robot_token_duration: Option<IntegerConfigItem>,
    pub self_registration: Option<BoolConfigItem>,
    pub storage_per_project: Option<IntegerConfigItem>,
    pub token_expiration: Option<IntegerConfigItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_configurations() {
        assert!(Configurations::default().is_empty());
        let configs = Configurations {
            read_only: Some(true),
            ..Default::default()
        };
        assert!(!configs.is_empty());
        assert_eq!(
            serde_json::to_value(&configs).unwrap(),
            serde_json::json!({ "read_only": true })
        );
    }

    #[test]
    fn parse_response_items() {
        let configs: ConfigurationsResponse = serde_json::from_str(
            r#"{
                "auth_mode": { "value": "db_auth", "editable": false },
                "read_only": { "value": false, "editable": true },
                "token_expiration": { "value": 30, "editable": true }
            }"#,
        )
        .unwrap();
        assert_eq!(configs.auth_mode.unwrap().value, "db_auth");
        assert!(configs.read_only.unwrap().editable);
        assert_eq!(configs.token_expiration.unwrap().value, 30);
        assert_eq!(configs.ldap_url, None);
    }
}
