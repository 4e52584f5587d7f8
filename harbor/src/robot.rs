// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Robot account subclient.

use crate::operation::Operation;
use crate::paging;
use crate::schema::{Robot, RobotCreate, RobotCreated, RobotSec, ROBOT_NAME_PREFIX};
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RobotError {
    #[error("invalid robot account request")]
    Invalid,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the robot account")]
    NoPermission,
    #[error("resource unknown")]
    UnknownResource,
    #[error("robot account already exists")]
    AlreadyExists,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("no robot account provided")]
    NotProvided,
    #[error("robot account not found on server side")]
    NotFound,
    #[error("id/name pair not found on server side")]
    Mismatch,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> RobotError {
    let Some((operation, status)) = err.operation_status() else {
        return RobotError::Transport(err);
    };

    match (operation, status) {
        (Operation::CreateRobot, StatusCode::CONFLICT) => RobotError::AlreadyExists,
        (_, StatusCode::BAD_REQUEST) => RobotError::Invalid,
        (_, StatusCode::UNAUTHORIZED) => RobotError::Unauthorized,
        (_, StatusCode::FORBIDDEN) => RobotError::NoPermission,
        (_, StatusCode::NOT_FOUND) => RobotError::UnknownResource,
        (_, StatusCode::INTERNAL_SERVER_ERROR) => RobotError::InternalErrors,
        _ => RobotError::Transport(err),
    }
}

/// Strips Harbor's `robot$` prefix off a robot account name.
fn bare_name(name: &str) -> &str {
    name.strip_prefix(ROBOT_NAME_PREFIX).unwrap_or(name)
}

/// Operations on robot accounts.
pub struct RobotClient<'a> {
    client: &'a HarborClient,
}

impl<'a> RobotClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> RobotClient<'a> {
        RobotClient { client }
    }

    /// Creates a robot account. The returned secret is not retrievable later.
    pub async fn new_robot_account(&self, robot: &RobotCreate) -> Result<RobotCreated, RobotError> {
        if robot.name.is_empty() {
            return Err(RobotError::NotProvided);
        }

        let request = Request::post(Operation::CreateRobot, &["robots"])
            .json(robot)
            .expect(StatusCode::CREATED);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Lists robot accounts, filtered by the client query option.
    pub async fn list_robot_accounts(&self) -> Result<Vec<Robot>, RobotError> {
        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request =
                Request::get(Operation::ListRobot, &["robots"]).page(client.options(), page);
            client.execute::<Vec<Robot>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Returns a robot account by its ID.
    pub async fn get_robot_account_by_id(&self, id: i64) -> Result<Robot, RobotError> {
        let request = Request::get(Operation::GetRobotById, &["robots", &id.to_string()]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Returns the robot account with the given name, given with or without
    /// the `robot$` prefix.
    pub async fn get_robot_account_by_name(&self, name: &str) -> Result<Robot, RobotError> {
        let wanted = bare_name(name);
        if wanted.is_empty() {
            return Err(RobotError::NotProvided);
        }

        let client = self.client;
        let options = client.options().lookup();
        let options = &options;
        let query = format!("name=~{}", wanted);
        let query = query.as_str();
        let robots = paging::collect_pages(options.page, move |page| {
            let request = Request::get(Operation::ListRobot, &["robots"])
                .query("q", query)
                .page(options, page);
            client.execute::<Vec<Robot>>(request)
        })
        .map_err(handle_errors)
        .await?;

        robots
            .into_iter()
            .find(|robot| bare_name(&robot.name) == wanted)
            .ok_or(RobotError::NotFound)
    }

    /// Updates a robot account. The stored account with the same ID must carry
    /// the same name.
    pub async fn update_robot_account(&self, robot: &Robot) -> Result<(), RobotError> {
        if robot.id == 0 {
            return Err(RobotError::NotProvided);
        }

        let stored = self.get_robot_account_by_id(robot.id).await?;
        if bare_name(&stored.name) != bare_name(&robot.name) {
            log::debug!(
                "Robot account {} is named {} on server side, {} was given",
                robot.id,
                &stored.name,
                &robot.name
            );
            return Err(RobotError::Mismatch);
        }

        let request =
            Request::put(Operation::UpdateRobot, &["robots", &robot.id.to_string()]).json(robot);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Deletes a robot account by its ID.
    pub async fn delete_robot_account_by_id(&self, id: i64) -> Result<(), RobotError> {
        if id == 0 {
            return Err(RobotError::NotProvided);
        }

        let request = Request::delete(Operation::DeleteRobot, &["robots", &id.to_string()]);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Looks a robot account up by name and deletes it.
    pub async fn delete_robot_account_by_name(&self, name: &str) -> Result<(), RobotError> {
        let robot = self.get_robot_account_by_name(name).await?;
        self.delete_robot_account_by_id(robot.id).await
    }

    /// Sets a new secret for a robot account. Harbor generates one when `secret` is empty.
    pub async fn refresh_robot_account_secret_by_id(
        &self,
        id: i64,
        secret: &str,
    ) -> Result<RobotSec, RobotError> {
        if id == 0 {
            return Err(RobotError::NotProvided);
        }

        let request = Request::patch(Operation::RefreshSec, &["robots", &id.to_string()]).json(
            &RobotSec {
                secret: secret.to_string(),
            },
        );
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Access, RobotPermission, ROBOT_LEVEL_SYSTEM};
    use crate::testing::{api, client, harbor_error, page};
    use rstest::rstest;
    use wiremock::matchers::{any, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn robot_json(id: i64, name: &str) -> serde_json::Value {
        serde_json::json!({ "id": id, "name": name, "level": "system", "duration": -1 })
    }

    fn robot_create(name: &str) -> RobotCreate {
        RobotCreate {
            name: name.to_string(),
            level: String::from(ROBOT_LEVEL_SYSTEM),
            duration: -1,
            permissions: vec![RobotPermission {
                kind: String::from("project"),
                namespace: String::from("library"),
                access: vec![Access {
                    resource: String::from("repository"),
                    action: String::from("pull"),
                    effect: String::new(),
                }],
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn new_robot_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("/robots")))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 4, "name": "robot$ci", "secret": "s3cr3t", "expires_at": -1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client(&server)
            .robots()
            .new_robot_account(&robot_create("ci"))
            .await
            .unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.secret, "s3cr3t");
    }

    #[rstest]
    #[case(400, RobotError::Invalid)]
    #[case(401, RobotError::Unauthorized)]
    #[case(403, RobotError::NoPermission)]
    #[case(404, RobotError::UnknownResource)]
    #[case(409, RobotError::AlreadyExists)]
    #[case(500, RobotError::InternalErrors)]
    #[tokio::test]
    async fn new_robot_account_errors(#[case] status: u16, #[case] expected: RobotError) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("/robots")))
            .respond_with(harbor_error(status))
            .mount(&server)
            .await;

        let err = client(&server)
            .robots()
            .new_robot_account(&robot_create("ci"))
            .await
            .unwrap_err();
        assert_eq!(
            std::mem::discriminant(&err),
            std::mem::discriminant(&expected)
        );
    }

    #[rstest]
    #[case("ci")]
    #[case("robot$ci")]
    #[tokio::test]
    async fn robot_by_name(#[case] name: &str) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/robots")))
            .and(query_param("q", "name=~ci"))
            .respond_with(page(
                serde_json::json!([robot_json(3, "robot$ci-nightly"), robot_json(4, "robot$ci")]),
                2,
            ))
            .mount(&server)
            .await;

        let robot = client(&server)
            .robots()
            .get_robot_account_by_name(name)
            .await
            .unwrap();
        assert_eq!(robot.id, 4);
    }

    #[tokio::test]
    async fn robot_by_name_ignores_caller_paging() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/robots")))
            .and(query_param("q", "name=~ci"))
            .and(query_param("page", "1"))
            .respond_with(page(serde_json::json!([robot_json(4, "robot$ci")]), 1))
            .expect(1)
            .mount(&server)
            .await;

        let harbor = client(&server)
            .with_options(crate::ClientOptions::default().with_page(3).with_query("x"));
        let robot = harbor
            .robots()
            .get_robot_account_by_name("ci")
            .await
            .unwrap();
        assert_eq!(robot.id, 4);
    }

    #[tokio::test]
    async fn robot_by_name_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/robots")))
            .respond_with(page(serde_json::json!([robot_json(3, "robot$ci-nightly")]), 1))
            .mount(&server)
            .await;

        let err = client(&server)
            .robots()
            .get_robot_account_by_name("ci")
            .await
            .unwrap_err();
        assert!(matches!(err, RobotError::NotFound));
    }

    #[tokio::test]
    async fn update_robot_without_id() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .robots()
            .update_robot_account(&Robot::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RobotError::NotProvided));
    }

    #[tokio::test]
    async fn update_robot_name_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/robots/4")))
            .respond_with(ResponseTemplate::new(200).set_body_json(robot_json(4, "robot$other")))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let robot = Robot {
            id: 4,
            name: String::from("robot$ci"),
            ..Default::default()
        };
        let err = client(&server)
            .robots()
            .update_robot_account(&robot)
            .await
            .unwrap_err();
        assert!(matches!(err, RobotError::Mismatch));
    }

    #[tokio::test]
    async fn delete_robot_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/robots")))
            .respond_with(page(serde_json::json!([robot_json(4, "robot$ci")]), 1))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(api("/robots/4")))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .robots()
            .delete_robot_account_by_name("ci")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn refresh_secret() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(api("/robots/4")))
            .and(body_json(serde_json::json!({ "secret": "" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "secret": "n3w" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let sec = client(&server)
            .robots()
            .refresh_robot_account_secret_by_id(4, "")
            .await
            .unwrap();
        assert_eq!(sec.secret, "n3w");
    }
}
