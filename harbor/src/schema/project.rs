//! Project, project metadata and project member schemas.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// JSON struct for a Harbor project
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Project {
    pub project_id: i64,
    pub owner_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub togglable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_role_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_role_ids: Option<Vec<i64>>,
    pub repo_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProjectMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve_allowlist: Option<CveAllowlist>,
}

/// JSON struct for the request body creating or updating a project
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProjectReq {
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProjectMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve_allowlist: Option<CveAllowlist>,
    /// Storage quota of the project in bytes, -1 for unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_limit: Option<i64>,
    /// Upstream registry of a proxy cache project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<i64>,
}

/// Typed project metadata. Harbor stores every value as a string ("true", "false", ...).
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProjectMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_content_trust: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevent_vul: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reuse_sys_cve_allowlist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_id: Option<String>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CveAllowlist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    /// Expiry as unix timestamp, absent for a permanent allowlist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub items: Vec<CveAllowlistItem>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CveAllowlistItem {
    pub cve_id: String,
}

/// Keys of the project metadata API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectMetadataKey {
    Public,
    EnableContentTrust,
    PreventVul,
    Severity,
    AutoScan,
    ReuseSysCveAllowlist,
    RetentionId,
}

impl ProjectMetadataKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectMetadataKey::Public => "public",
            ProjectMetadataKey::EnableContentTrust => "enable_content_trust",
            ProjectMetadataKey::PreventVul => "prevent_vul",
            ProjectMetadataKey::Severity => "severity",
            ProjectMetadataKey::AutoScan => "auto_scan",
            ProjectMetadataKey::ReuseSysCveAllowlist => "reuse_sys_cve_allowlist",
            ProjectMetadataKey::RetentionId => "retention_id",
        }
    }
}

impl std::fmt::Display for ProjectMetadataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw project metadata as served by the metadata API.
pub type ProjectMetadataMap = HashMap<String, String>;

/// Roles a project member can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    ProjectAdmin,
    Developer,
    Guest,
    Maintainer,
    LimitedGuest,
}

impl MemberRole {
    pub fn id(self) -> i64 {
        match self {
            MemberRole::ProjectAdmin => 1,
            MemberRole::Developer => 2,
            MemberRole::Guest => 3,
            MemberRole::Maintainer => 4,
            MemberRole::LimitedGuest => 5,
        }
    }
}

/// JSON struct for the request body adding a member to a project
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProjectMember {
    pub role_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_user: Option<UserEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_group: Option<UserGroup>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UserEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UserGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// 1 for LDAP groups, 2 for HTTP groups, 3 for OIDC groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_group_dn: Option<String>,
}

/// JSON struct for a project member as listed by Harbor
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProjectMemberEntity {
    pub id: i64,
    pub project_id: i64,
    pub entity_name: String,
    pub role_name: String,
    pub role_id: i64,
    pub entity_id: i64,
    /// "u" for users, "g" for groups.
    pub entity_type: String,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RoleRequest {
    pub role_id: i64,
}
