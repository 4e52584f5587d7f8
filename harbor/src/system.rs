// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! System subclient: health, version information and statistics.

use crate::operation::Operation;
use crate::schema::{GeneralInfo, OverallHealthStatus, Statistic, SystemInfo};
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the system information")]
    NoPermission,
    #[error("resource not found on server side")]
    NotFound,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> SystemError {
    let Some((_, status)) = err.operation_status() else {
        return SystemError::Transport(err);
    };

    match status {
        StatusCode::UNAUTHORIZED => SystemError::Unauthorized,
        StatusCode::FORBIDDEN => SystemError::NoPermission,
        StatusCode::NOT_FOUND => SystemError::NotFound,
        StatusCode::INTERNAL_SERVER_ERROR => SystemError::InternalErrors,
        _ => SystemError::Transport(err),
    }
}

pub struct SystemClient<'a> {
    client: &'a HarborClient,
}

impl<'a> SystemClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> SystemClient<'a> {
        SystemClient { client }
    }

    /// Returns the health of Harbor and of each of its components.
    pub async fn health(&self) -> Result<OverallHealthStatus, SystemError> {
        let request = Request::get(Operation::GetHealth, &["health"]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Pings Harbor. Returns the plain text answer, "Pong" when Harbor is up.
    pub async fn ping(&self) -> Result<String, SystemError> {
        let request = Request::get(Operation::GetPing, &["ping"]);
        let response = self
            .client
            .execute_text(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Returns general information such as the Harbor version and auth mode.
    pub async fn get_system_info(&self) -> Result<GeneralInfo, SystemError> {
        let request = Request::get(Operation::GetSystemInfo, &["systeminfo"]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Returns the capacity and free space of the storage volumes.
    pub async fn get_system_volumes(&self) -> Result<SystemInfo, SystemError> {
        let request = Request::get(Operation::GetVolumes, &["systeminfo", "volumes"]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Returns project and repository counts.
    pub async fn get_statistics(&self) -> Result<Statistic, SystemError> {
        let request = Request::get(Operation::GetStatistic, &["statistics"]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }
}
