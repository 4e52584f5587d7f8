// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! System configuration subclient.

use crate::operation::Operation;
use crate::schema::{Configurations, ConfigurationsResponse};
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error("bad request")]
    BadRequest,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the configurations")]
    NoPermission,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("no configuration provided")]
    NotProvided,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> ConfigureError {
    let Some((_, status)) = err.operation_status() else {
        return ConfigureError::Transport(err);
    };

    match status {
        StatusCode::BAD_REQUEST => ConfigureError::BadRequest,
        StatusCode::UNAUTHORIZED => ConfigureError::Unauthorized,
        StatusCode::FORBIDDEN => ConfigureError::NoPermission,
        StatusCode::INTERNAL_SERVER_ERROR => ConfigureError::InternalErrors,
        _ => ConfigureError::Transport(err),
    }
}

pub struct ConfigureClient<'a> {
    client: &'a HarborClient,
}

impl<'a> ConfigureClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> ConfigureClient<'a> {
        ConfigureClient { client }
    }

    /// Returns the system configurations with their editable flags.
    pub async fn get_configs(&self) -> Result<ConfigurationsResponse, ConfigureError> {
        let request = Request::get(Operation::GetConfigurations, &["configurations"]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Updates the configuration items that are set, leaving the others untouched.
    pub async fn update_configs(&self, configs: &Configurations) -> Result<(), ConfigureError> {
        if configs.is_empty() {
            return Err(ConfigureError::NotProvided);
        }

        let request =
            Request::put(Operation::UpdateConfigurations, &["configurations"]).json(configs);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{api, client, harbor_error};
    use rstest::rstest;
    use wiremock::matchers::{any, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_configs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/configurations")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "auth_mode": { "value": "oidc_auth", "editable": false },
                "robot_token_duration": { "value": 30, "editable": true }
            })))
            .mount(&server)
            .await;

        let configs = client(&server).configure().get_configs().await.unwrap();
        assert_eq!(configs.auth_mode.unwrap().value, "oidc_auth");
        assert_eq!(configs.robot_token_duration.unwrap().value, 30);
    }

    #[tokio::test]
    async fn update_only_sends_set_items() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(api("/configurations")))
            .and(body_json(
                serde_json::json!({ "self_registration": false, "token_expiration": 60 }),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let configs = Configurations {
            self_registration: Some(false),
            token_expiration: Some(60),
            ..Default::default()
        };
        client(&server)
            .configure()
            .update_configs(&configs)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_update_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .configure()
            .update_configs(&Configurations::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigureError::NotProvided));
    }

    #[rstest]
    #[case(400, ConfigureError::BadRequest)]
    #[case(401, ConfigureError::Unauthorized)]
    #[case(403, ConfigureError::NoPermission)]
    #[case(500, ConfigureError::InternalErrors)]
    #[tokio::test]
    async fn update_errors(#[case] status: u16, #[case] expected: ConfigureError) {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(api("/configurations")))
            .respond_with(harbor_error(status))
            .mount(&server)
            .await;

        let configs = Configurations {
            read_only: Some(true),
            ..Default::default()
        };
        let err = client(&server)
            .configure()
            .update_configs(&configs)
            .await
            .unwrap_err();
        assert_eq!(
            std::mem::discriminant(&err),
            std::mem::discriminant(&expected)
        );
    }
}
