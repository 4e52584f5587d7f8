//! Robot account schemas.

use serde::{Deserialize, Serialize};

/// Prefix Harbor puts in front of robot account names.
pub const ROBOT_NAME_PREFIX: &str = "robot$";

pub const ROBOT_LEVEL_SYSTEM: &str = "system";
pub const ROBOT_LEVEL_PROJECT: &str = "project";

/// JSON struct for a robot account
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Robot {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret: String,
    pub level: String,
    /// Lifetime in days, -1 for never expiring accounts.
    pub duration: i64,
    pub editable: bool,
    pub disable: bool,
    pub expires_at: i64,
    pub permissions: Vec<RobotPermission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RobotPermission {
    /// "project" or "system".
    pub kind: String,
    /// Project name, or "*" for all projects.
    pub namespace: String,
    pub access: Vec<Access>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Access {
    pub resource: String,
    pub action: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub effect: String,
}

/// JSON struct for the request body creating a robot account
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RobotCreate {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret: String,
    pub level: String,
    pub disable: bool,
    pub duration: i64,
    pub permissions: Vec<RobotPermission>,
}

/// JSON struct returned once a robot account is created. The secret is only shown here.
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RobotCreated {
    pub id: i64,
    pub name: String,
    pub secret: String,
    pub creation_time: Option<String>,
    pub expires_at: i64,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RobotSec {
    pub secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_robot() {
        let robot: Robot = serde_json::from_str(
            r#"{
                "id": 5,
                "name": "robot$ci",
                "level": "system",
                "duration": -1,
                "permissions": [{
                    "kind": "project",
                    "namespace": "library",
                    "access": [{ "resource": "repository", "action": "push" }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(robot.id, 5);
        assert_eq!(robot.duration, -1);
        assert_eq!(robot.permissions[0].access[0].action, "push");
        assert!(robot.name.starts_with(ROBOT_NAME_PREFIX));
    }
}
