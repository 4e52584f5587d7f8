//! System health, information and statistics schemas.

use serde::{Deserialize, Serialize};

pub const HEALTH_STATUS_HEALTHY: &str = "healthy";

/// JSON struct for the health of Harbor and its components
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OverallHealthStatus {
    pub status: String,
    pub components: Vec<ComponentHealthStatus>,
}

impl OverallHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTH_STATUS_HEALTHY
    }

    /// Returns the components that do not report healthy.
    pub fn unhealthy_components(&self) -> Vec<&ComponentHealthStatus> {
        self.components
            .iter()
            .filter(|component| component.status != HEALTH_STATUS_HEALTHY)
            .collect()
    }
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ComponentHealthStatus {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON struct for general system information
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneralInfo {
    pub with_notary: Option<bool>,
    pub with_chartmuseum: Option<bool>,
    pub registry_url: Option<String>,
    pub external_url: Option<String>,
    pub auth_mode: Option<String>,
    pub primary_auth_mode: Option<bool>,
    pub project_creation_restriction: Option<String>,
    pub self_registration: Option<bool>,
    pub has_ca_root: Option<bool>,
    pub harbor_version: Option<String>,
    pub registry_storage_provider_name: Option<String>,
    pub read_only: Option<bool>,
    pub notification_enable: Option<bool>,
}

/// JSON struct for the storage volumes of the registry
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SystemInfo {
    pub storage: Vec<Storage>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Storage {
    pub total: u64,
    pub free: u64,
}

/// JSON struct for project and repository statistics
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Statistic {
    pub private_project_count: i64,
    pub private_repo_count: i64,
    pub public_project_count: i64,
    pub public_repo_count: i64,
    pub total_project_count: i64,
    pub total_repo_count: i64,
    /// Bytes.
    pub total_storage_consumption: i64,
}
